//! Outcome type - the bi-state result of a fallible computation.
//!
//! An [`Outcome<A>`] is either `Success(A)` or `Failure(Error)`. It is what a
//! `TryAsync<A>` produces each time it is run.
//!
//! # Examples
//!
//! ```rust
//! use tryflow::control::{Error, Outcome};
//!
//! let success: Outcome<i32> = Outcome::Success(21);
//! assert_eq!(success.map(|x| x * 2), Outcome::Success(42));
//!
//! let failure: Outcome<i32> = Outcome::Failure(Error::msg("nope"));
//! let text = failure.match_with(|x| x.to_string(), |error| error.to_string());
//! assert_eq!(text, "nope");
//! ```

use super::Error;
use super::OptionOutcome;

/// The result of running a fallible computation once.
///
/// The tag fully determines which payload is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<A> {
    /// The computation produced a value.
    Success(A),
    /// The computation failed.
    Failure(Error),
}

impl<A> Outcome<A> {
    // =========================================================================
    // Type Checking
    // =========================================================================

    /// Returns `true` if this is a `Success`.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is a `Failure`.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Total projection: exactly one of the handlers is invoked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tryflow::control::Outcome;
    ///
    /// let outcome: Outcome<i32> = Outcome::Success(3);
    /// assert_eq!(outcome.match_with(|x| x + 1, |_| 0), 4);
    /// ```
    pub fn match_with<R, S, F>(self, on_success: S, on_failure: F) -> R
    where
        S: FnOnce(A) -> R,
        F: FnOnce(Error) -> R,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    /// Transforms the success payload. The mapper is not called on `Failure`.
    pub fn map<B, F>(self, function: F) -> Outcome<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Success(value) => Outcome::Success(function(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transforms the failure payload.
    pub fn map_failure<F>(self, function: F) -> Self
    where
        F: FnOnce(Error) -> Error,
    {
        match self {
            Self::Success(value) => Self::Success(value),
            Self::Failure(error) => Self::Failure(function(error)),
        }
    }

    /// Chains a function that itself produces an `Outcome`.
    pub fn and_then<B, F>(self, function: F) -> Outcome<B>
    where
        F: FnOnce(A) -> Outcome<B>,
    {
        match self {
            Self::Success(value) => function(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    // =========================================================================
    // Value Extraction
    // =========================================================================

    /// Returns the success value or the given default.
    pub fn if_fail(self, default: A) -> A {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Returns the success value or computes one from the error.
    pub fn if_fail_with<F>(self, function: F) -> A
    where
        F: FnOnce(Error) -> A,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => function(error),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<A, Error> {
        self.into()
    }

    /// Returns the success value, discarding any error.
    pub fn ok(self) -> Option<A> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns a reference to the error, if any.
    pub const fn failure(&self) -> Option<&Error> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Widens into the tri-state representation.
    pub fn into_option_outcome(self) -> OptionOutcome<A> {
        match self {
            Self::Success(value) => OptionOutcome::Some(value),
            Self::Failure(error) => OptionOutcome::Failure(error),
        }
    }
}

impl<A> From<Result<A, Error>> for Outcome<A> {
    fn from(result: Result<A, Error>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<A> From<Outcome<A>> for Result<A, Error> {
    fn from(outcome: Outcome<A>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_predicates() {
        let success: Outcome<i32> = Outcome::Success(1);
        let failure: Outcome<i32> = Outcome::Failure(Error::Bottom);
        assert!(success.is_success());
        assert!(!success.is_failure());
        assert!(failure.is_failure());
        assert!(!failure.is_success());
    }

    #[test]
    fn test_match_invokes_only_success_branch() {
        let failure_calls = Cell::new(0);
        let result = Outcome::Success(5).match_with(
            |x| x * 10,
            |_| {
                failure_calls.set(failure_calls.get() + 1);
                0
            },
        );
        assert_eq!(result, 50);
        assert_eq!(failure_calls.get(), 0);
    }

    #[test]
    fn test_match_invokes_only_failure_branch() {
        let success_calls = Cell::new(0);
        let result = Outcome::<i32>::Failure(Error::msg("e")).match_with(
            |x| {
                success_calls.set(success_calls.get() + 1);
                x
            },
            |_| -1,
        );
        assert_eq!(result, -1);
        assert_eq!(success_calls.get(), 0);
    }

    #[test]
    fn test_map_does_not_touch_failure() {
        let called = Cell::new(false);
        let failure: Outcome<i32> = Outcome::Failure(Error::msg("e"));
        let mapped = failure.map(|x| {
            called.set(true);
            x + 1
        });
        assert_eq!(mapped, Outcome::Failure(Error::msg("e")));
        assert!(!called.get());
    }

    #[test]
    fn test_result_conversions() {
        let outcome: Outcome<i32> = Ok(3).into();
        assert_eq!(outcome.clone().into_result(), Ok(3));
        assert_eq!(outcome.ok(), Some(3));

        let failure: Outcome<i32> = Err(Error::InvalidJoin).into();
        assert_eq!(failure.failure(), Some(&Error::InvalidJoin));
        assert_eq!(failure.if_fail(9), 9);
    }

    #[test]
    fn test_into_option_outcome() {
        assert_eq!(
            Outcome::Success(1).into_option_outcome(),
            OptionOutcome::Some(1)
        );
        assert_eq!(
            Outcome::<i32>::Failure(Error::Bottom).into_option_outcome(),
            OptionOutcome::Failure(Error::Bottom)
        );
    }
}
