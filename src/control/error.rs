//! Error type carried by failed computations.
//!
//! Every failure produced by this library is an [`Error`]. It is cheap to
//! clone (user errors are held behind an `Arc`) so that memoized results and
//! merged streams can hand the same failure to several callers.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// The error carried by `Failure` states.
///
/// # Equality
///
/// Two errors are equal when they are the same variant and render the same
/// text. A wrapped user error is therefore never equal to a [`Error::msg`]
/// error, even with identical text: `Error::new(io::Error::other("x"))` and
/// `Error::msg("x")` differ. Compare [`Error::message`] to ignore the
/// variant, or [`Error::downcast_ref`] to inspect the wrapped type.
///
/// # Examples
///
/// ```rust
/// use tryflow::control::Error;
///
/// let error = Error::msg("connection refused");
/// assert_eq!(error.to_string(), "connection refused");
/// assert!(!error.is_panic());
/// ```
#[derive(Clone, thiserror::Error)]
pub enum Error {
    /// An error returned by user logic.
    #[error("{0}")]
    Failed(Arc<dyn StdError + Send + Sync>),

    /// A plain message error.
    #[error("{0}")]
    Message(Arc<str>),

    /// User logic panicked; the payload is rendered as text.
    #[error("computation panicked: {0}")]
    Panicked(Arc<str>),

    /// Two joined computations produced values whose keys differ.
    #[error("invalid join: keys of the joined values do not match")]
    InvalidJoin,

    /// A value was required but the computation had none, or it was
    /// rejected by a filter.
    #[error("bottom: no value available")]
    Bottom,
}

impl Error {
    /// Wraps any error type.
    ///
    /// An [`Error`] passed in is returned as-is rather than nested.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(error);
        match boxed.downcast::<Self>() {
            Ok(error) => *error,
            Err(other) => Self::Failed(Arc::from(other)),
        }
    }

    /// Creates an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(Arc::from(message.into()))
    }

    /// Converts a panic payload as returned by `catch_unwind`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked(Arc::from(message))
    }

    /// The error text, regardless of variant.
    ///
    /// Unlike `to_string`, a captured panic yields the bare payload without
    /// the `computation panicked:` prefix.
    ///
    /// ```rust
    /// use tryflow::control::Error;
    ///
    /// let wrapped = Error::new(std::io::Error::other("refused"));
    /// assert_ne!(wrapped, Error::msg("refused"));
    /// assert_eq!(wrapped.message(), Error::msg("refused").message());
    /// ```
    pub fn message(&self) -> String {
        match self {
            Self::Failed(inner) => inner.to_string(),
            Self::Message(message) | Self::Panicked(message) => message.to_string(),
            Self::InvalidJoin | Self::Bottom => self.to_string(),
        }
    }

    /// Returns `true` if this error was captured from a panic.
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Attempts to view the wrapped user error as a concrete type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Failed(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(inner) => formatter.debug_tuple("Failed").field(inner).finish(),
            Self::Message(message) => formatter.debug_tuple("Message").field(message).finish(),
            Self::Panicked(message) => formatter.debug_tuple("Panicked").field(message).finish(),
            Self::InvalidJoin => formatter.write_str("InvalidJoin"),
            Self::Bottom => formatter.write_str("Bottom"),
        }
    }
}

/// Errors compare by variant and rendered message.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string()
    }
}

impl Eq for Error {}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn test_new_wraps_user_error() {
        let error = Error::new(DiskFull);
        assert_eq!(error.to_string(), "disk full");
        assert!(error.downcast_ref::<DiskFull>().is_some());
    }

    #[test]
    fn test_new_does_not_nest_error() {
        let error = Error::new(Error::InvalidJoin);
        assert_eq!(error, Error::InvalidJoin);
    }

    #[test]
    fn test_from_panic_str_payload() {
        let payload = std::panic::catch_unwind(|| -> i32 { panic!("boom") }).unwrap_err();
        let error = Error::from_panic(payload.as_ref());
        assert!(error.is_panic());
        assert_eq!(error.to_string(), "computation panicked: boom");
    }

    #[test]
    fn test_from_panic_string_payload() {
        let payload = std::panic::catch_unwind(|| -> i32 { panic!("code {}", 7) }).unwrap_err();
        let error = Error::from_panic(payload.as_ref());
        assert_eq!(error.to_string(), "computation panicked: code 7");
    }

    #[test]
    fn test_equality_by_variant_and_message() {
        assert_eq!(Error::msg("a"), Error::from("a"));
        assert_ne!(Error::msg("a"), Error::msg("b"));
        assert_ne!(Error::msg("bottom: no value available"), Error::Bottom);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("refused")]
    struct Refused;

    #[test]
    fn test_wrapped_error_differs_from_message_with_same_text() {
        let wrapped = Error::new(Refused);
        assert_ne!(wrapped, Error::msg("refused"));
        assert_eq!(wrapped.message(), "refused");
        assert_eq!(wrapped.message(), Error::msg("refused").message());
    }

    #[test]
    fn test_message_strips_panic_prefix() {
        let payload = std::panic::catch_unwind(|| -> i32 { panic!("boom") }).unwrap_err();
        assert_eq!(Error::from_panic(payload.as_ref()).message(), "boom");
        assert_eq!(Error::Bottom.message(), "bottom: no value available");
    }

    #[test]
    fn test_clone_shares_inner() {
        let error = Error::new(DiskFull);
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
