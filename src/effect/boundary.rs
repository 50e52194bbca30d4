//! The computation boundary: where user errors and panics become `Failure`.
//!
//! Nothing that crosses this boundary may unwind into the caller. Every
//! error captured here is also reported to the process-wide
//! [`ErrorLogger`](super::ErrorLogger).

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::logger::error_logger;
use crate::control::Error;

/// A re-invocable deferred computation producing `R`.
pub(crate) type Thunk<R> = Arc<dyn Fn() -> BoxFuture<'static, R> + Send + Sync>;

/// Hands `error` to the error logger and returns it.
pub(crate) fn report(error: Error) -> Error {
    error_logger().log(&error);
    error
}

/// Runs synchronous user logic, capturing a panic as an error.
pub(crate) fn guard<T, F>(function: F) -> Result<T, Error>
where
    F: FnOnce() -> T,
{
    std::panic::catch_unwind(AssertUnwindSafe(function))
        .map_err(|payload| report(Error::from_panic(payload.as_ref())))
}

/// Drives a user future to completion, capturing a panic as an error.
pub(crate) async fn guard_future<Fut>(future: Fut) -> Result<Fut::Output, Error>
where
    Fut: Future,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| report(Error::from_panic(payload.as_ref())))
}
