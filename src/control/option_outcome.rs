//! OptionOutcome type - the tri-state result of an optional, fallible computation.
//!
//! An [`OptionOutcome<A>`] is `Some(A)`, `None` or `Failure(Error)`. Absence
//! is not an error: it is a normal terminal state with its own branch in
//! [`OptionOutcome::match_with`].

use super::Error;
use super::Outcome;

/// The result of running an optional, fallible computation once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionOutcome<A> {
    /// The computation produced a value.
    Some(A),
    /// The computation completed without a value.
    None,
    /// The computation failed.
    Failure(Error),
}

impl<A> OptionOutcome<A> {
    /// Returns `true` if this is `Some`.
    #[inline]
    pub const fn is_some(&self) -> bool {
        matches!(self, Self::Some(_))
    }

    /// Returns `true` if this is `None`.
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is `Failure`.
    #[inline]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns `true` for any state other than `Some`.
    ///
    /// This is the short-circuit decision used by every combinator.
    #[inline]
    pub const fn is_none_or_failure(&self) -> bool {
        !self.is_some()
    }

    /// Total projection: exactly one of the three handlers is invoked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tryflow::control::OptionOutcome;
    ///
    /// let outcome: OptionOutcome<i32> = OptionOutcome::None;
    /// let text = outcome.match_with(|x| x.to_string(), || "none".to_string(), |e| e.to_string());
    /// assert_eq!(text, "none");
    /// ```
    pub fn match_with<R, S, N, F>(self, on_some: S, on_none: N, on_failure: F) -> R
    where
        S: FnOnce(A) -> R,
        N: FnOnce() -> R,
        F: FnOnce(Error) -> R,
    {
        match self {
            Self::Some(value) => on_some(value),
            Self::None => on_none(),
            Self::Failure(error) => on_failure(error),
        }
    }

    /// Transforms the `Some` payload; `None` and `Failure` pass through.
    pub fn map<B, F>(self, function: F) -> OptionOutcome<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Some(value) => OptionOutcome::Some(function(value)),
            Self::None => OptionOutcome::None,
            Self::Failure(error) => OptionOutcome::Failure(error),
        }
    }

    /// Chains a function that itself produces an `OptionOutcome`.
    pub fn and_then<B, F>(self, function: F) -> OptionOutcome<B>
    where
        F: FnOnce(A) -> OptionOutcome<B>,
    {
        match self {
            Self::Some(value) => function(value),
            Self::None => OptionOutcome::None,
            Self::Failure(error) => OptionOutcome::Failure(error),
        }
    }

    /// Returns the value, or `default` when `None` or `Failure`.
    pub fn if_none_or_fail(self, default: A) -> A {
        match self {
            Self::Some(value) => value,
            Self::None | Self::Failure(_) => default,
        }
    }

    /// Converts into `Result<Option<A>, Error>`.
    pub fn into_result(self) -> Result<Option<A>, Error> {
        self.into()
    }

    /// Returns the value, if any, discarding the failure.
    pub fn ok(self) -> Option<A> {
        match self {
            Self::Some(value) => Some(value),
            Self::None | Self::Failure(_) => None,
        }
    }

    /// Narrows into the bi-state representation; `None` becomes
    /// `Failure(Error::Bottom)`.
    pub fn into_outcome(self) -> Outcome<A> {
        match self {
            Self::Some(value) => Outcome::Success(value),
            Self::None => Outcome::Failure(Error::Bottom),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }
}

impl<A> From<Option<A>> for OptionOutcome<A> {
    fn from(option: Option<A>) -> Self {
        option.map_or(Self::None, Self::Some)
    }
}

impl<A> From<Result<Option<A>, Error>> for OptionOutcome<A> {
    fn from(result: Result<Option<A>, Error>) -> Self {
        match result {
            Ok(Some(value)) => Self::Some(value),
            Ok(None) => Self::None,
            Err(error) => Self::Failure(error),
        }
    }
}

impl<A> From<OptionOutcome<A>> for Result<Option<A>, Error> {
    fn from(outcome: OptionOutcome<A>) -> Self {
        match outcome {
            OptionOutcome::Some(value) => Ok(Some(value)),
            OptionOutcome::None => Ok(None),
            OptionOutcome::Failure(error) => Err(error),
        }
    }
}
