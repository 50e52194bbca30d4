//! Deferred asynchronous computations over fallible results.
//!
//! This module provides the computation types and the decorators that wrap
//! them:
//!
//! - [`TryAsync`]: re-invocable async logic producing an `Outcome`
//! - [`TryOptionAsync`]: re-invocable async logic producing an `OptionOutcome`
//! - [`TryAsync::memo`] / [`TryAsync::memo_exclusive`]: result caching
//! - [`Schedule`], [`TryAsync::retry`], [`TryAsync::retry_backoff`]: retrying
//! - [`IntoProjection`], [`Pure`], [`Suspend`]: uniform `match_with` handlers
//! - [`ErrorLogger`], [`set_error_logger`]: the process-wide diagnostics hook
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tryflow::control::Outcome;
//! use tryflow::effect::TryAsync;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetch = TryAsync::new(|| async { reqwest_like_get("https://example.com").await })
//!         .retry_backoff(Duration::from_millis(50), 4)
//!         .memo();
//!
//!     // Runs (and retries) once; the second await hits the cache.
//!     let first = fetch.run().await;
//!     let second = fetch.run().await;
//!     assert_eq!(first, second);
//! }
//! ```

pub(crate) mod boundary;

// =============================================================================
// Configuration
// =============================================================================

mod logger;

pub use logger::{
    ConfigError, ErrorLogger, NoopLogger, TracingLogger, error_logger, set_error_logger,
};

// =============================================================================
// Handler Projection
// =============================================================================

mod projection;

pub use projection::{IntoProjection, Pure, Suspend};

// =============================================================================
// Decorators
// =============================================================================

mod memo;
mod schedule;

pub use memo::MemoCell;
pub use schedule::Schedule;

// =============================================================================
// Computations
// =============================================================================

mod try_async;
mod try_option_async;

pub use try_async::TryAsync;
pub use try_option_async::TryOptionAsync;

pub use crate::control::{Error, OptionOutcome, Outcome};
