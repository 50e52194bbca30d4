//! # tryflow
//!
//! Deferred, re-invocable asynchronous computations over explicit results,
//! with memoization, retry and concurrent stream fan-in.
//!
//! ## Overview
//!
//! - **Results**: [`Outcome`](control::Outcome) and
//!   [`OptionOutcome`](control::OptionOutcome) make failure (and absence)
//!   ordinary values instead of unwinding
//! - **Computations**: [`TryAsync`](effect::TryAsync) and
//!   [`TryOptionAsync`](effect::TryOptionAsync) describe async logic that is
//!   re-run on every invocation, with `map`, `bind`, `match_with`, `fold`
//!   and friends
//! - **Decorators**: `memo` caches the first non-failure result; `retry` and
//!   `retry_backoff` re-run failing logic on a [`Schedule`](effect::Schedule)
//! - **Streams**: [`Producer`](pipes::Producer) and
//!   [`merge`](pipes::merge) fan several producers into one, with
//!   cooperative cancellation
//!
//! Panics and errors raised by user logic never escape a computation: they
//! become `Failure` values and are reported to the process-wide
//! [`ErrorLogger`](effect::ErrorLogger).
//!
//! ## Feature Flags
//!
//! - `control`: result types
//! - `effect`: async computations and decorators (requires tokio)
//! - `pipes`: producers and merge
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use tryflow::prelude::*;
//!
//! let outcome: Outcome<i32> = Outcome::Success(20).map(|x| x + 1);
//! assert_eq!(outcome.ok(), Some(21));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use tryflow::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "effect")]
    pub use crate::effect::*;

    #[cfg(feature = "pipes")]
    pub use crate::pipes::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "effect")]
pub mod effect;

#[cfg(feature = "pipes")]
pub mod pipes;
