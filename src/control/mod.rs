//! Result representations for fallible computations.
//!
//! This module provides the terminal states every computation in this
//! library ends in:
//!
//! - [`Outcome`]: `Success(A)` or `Failure(Error)`
//! - [`OptionOutcome`]: `Some(A)`, `None` or `Failure(Error)`
//! - [`Error`]: the cloneable error carried by `Failure`
//!
//! # Examples
//!
//! ```rust
//! use tryflow::control::{Error, OptionOutcome, Outcome};
//!
//! let parsed: Outcome<i32> = "42".parse::<i32>().map_err(Error::new).into();
//! assert_eq!(parsed, Outcome::Success(42));
//!
//! let missing: OptionOutcome<i32> = None.into();
//! assert!(missing.is_none_or_failure());
//! ```

mod error;
mod option_outcome;
mod outcome;

pub use error::Error;
pub use option_outcome::OptionOutcome;
pub use outcome::Outcome;

/// Classifies a terminal result as failed or not.
///
/// Retry and memoization only need to know whether a result is a
/// `Failure`; `None` counts as a terminal non-failure.
pub trait Fallible {
    /// Returns `true` if the result is a failure.
    fn is_failure(&self) -> bool;
}

impl<A> Fallible for Outcome<A> {
    #[inline]
    fn is_failure(&self) -> bool {
        Self::is_failure(self)
    }
}

impl<A> Fallible for OptionOutcome<A> {
    #[inline]
    fn is_failure(&self) -> bool {
        Self::is_failure(self)
    }
}
