//! Streaming producers and their fan-in.
//!
//! - [`Producer`]: a re-invocable source of values with stream adaptors and
//!   sinks that turn it into a [`TryAsync`](crate::effect::TryAsync)
//! - [`merge`] / [`merge_all`]: concurrent fan-in of many producers into one
//! - [`Environment`] / [`CancellationToken`]: cooperative cancellation of a
//!   running merge
//!
//! # Examples
//!
//! ```rust,ignore
//! use tryflow::pipes::{CancellationToken, Environment, Producer, merge};
//!
//! #[tokio::main]
//! async fn main() {
//!     let token = CancellationToken::new();
//!     let environment = Environment::with_cancellation(token.clone());
//!
//!     let merged = merge(
//!         [Producer::from_iter(1..=3), Producer::yield_one(100)],
//!         &environment,
//!     );
//!     let total = merged.collect().map(|items| items.iter().sum::<i32>());
//!     assert_eq!(total.await.ok(), Some(106));
//! }
//! ```

mod cancellation;
mod environment;
mod merge;
mod producer;

pub use cancellation::CancellationToken;
pub use environment::Environment;
pub use merge::{merge, merge_all};
pub use producer::Producer;
