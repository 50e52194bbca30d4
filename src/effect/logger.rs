//! Process-wide error logging hook.
//!
//! Every error captured at a computation boundary (an `Err` returned by user
//! logic, or a panic) is handed to the active [`ErrorLogger`] as a
//! diagnostics side-channel. The returned `Failure` is unaffected by it.
//!
//! The logger is global configuration: it can be set once, at process
//! start, with [`set_error_logger`]. Until then [`NoopLogger`] is used.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tryflow::effect::{TracingLogger, set_error_logger};
//!
//! fn main() {
//!     set_error_logger(Arc::new(TracingLogger)).expect("logger configured twice");
//! }
//! ```

use std::sync::{Arc, OnceLock};

use crate::control::Error;

/// Receives every error captured by a computation boundary.
pub trait ErrorLogger: Send + Sync {
    /// Called once per captured error.
    fn log(&self, error: &Error);
}

/// The default logger. Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ErrorLogger for NoopLogger {
    fn log(&self, _error: &Error) {}
}

/// Forwards captured errors to `tracing` at `ERROR` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn log(&self, error: &Error) {
        tracing::error!(error = %error, panicked = error.is_panic(), "computation failed");
    }
}

impl<F> ErrorLogger for F
where
    F: Fn(&Error) + Send + Sync,
{
    fn log(&self, error: &Error) {
        self(error);
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// [`set_error_logger`] was called after a logger had been installed.
    #[error("error logger has already been set")]
    LoggerAlreadySet,
}

static ERROR_LOGGER: OnceLock<Arc<dyn ErrorLogger>> = OnceLock::new();

/// Installs the process-wide error logger.
///
/// # Errors
///
/// Returns [`ConfigError::LoggerAlreadySet`] if a logger was installed
/// before. The first logger stays active.
pub fn set_error_logger(logger: Arc<dyn ErrorLogger>) -> Result<(), ConfigError> {
    ERROR_LOGGER
        .set(logger)
        .map_err(|_| ConfigError::LoggerAlreadySet)
}

/// Returns the active error logger.
pub fn error_logger() -> &'static dyn ErrorLogger {
    match ERROR_LOGGER.get() {
        Some(logger) => logger.as_ref(),
        None => &NoopLogger,
    }
}
