//! Memoization of deferred computations.
//!
//! Two policies are provided:
//!
//! - [`memo`] (relaxed): the first terminal non-failure result is cached in
//!   a [`MemoCell`]. No lock is held while the wrapped computation runs, so
//!   racing first invocations may each run it; the first to finish fills
//!   the cell and every later invocation (and every racer that finishes
//!   afterwards) returns that cached value.
//! - [`memo_exclusive`] (strict): first invocations are serialized on an
//!   async once-cell. The wrapped computation runs at most once per
//!   successful initialization.
//!
//! Under both policies a `Failure` is never cached, so callers may retry
//! through a memoized computation after a transient failure.

use std::sync::{Arc, OnceLock};

use futures::FutureExt;

use super::boundary::Thunk;
use crate::control::Fallible;

/// The cache slot behind a relaxed memoized computation.
///
/// Filled at most once; an empty cell means "has not run to a terminal
/// non-failure result yet".
#[derive(Debug)]
pub struct MemoCell<R> {
    slot: OnceLock<R>,
}

impl<R> MemoCell<R> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Returns `true` once a result has been cached.
    pub fn has_run(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns the cached result, if any.
    pub fn get(&self) -> Option<&R> {
        self.slot.get()
    }
}

impl<R: Fallible + Clone> MemoCell<R> {
    /// Offers a freshly computed result to the cell.
    ///
    /// Failures pass through untouched. Otherwise the cached value is
    /// returned, which is `result` unless another invocation got there
    /// first.
    pub fn settle(&self, result: R) -> R {
        if result.is_failure() {
            result
        } else {
            self.slot.get_or_init(|| result).clone()
        }
    }
}

impl<R> Default for MemoCell<R> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn memo<R>(thunk: Thunk<R>) -> Thunk<R>
where
    R: Fallible + Clone + Send + Sync + 'static,
{
    let cell: Arc<MemoCell<R>> = Arc::new(MemoCell::new());
    Arc::new(move || {
        let thunk = Arc::clone(&thunk);
        let cell = Arc::clone(&cell);
        async move {
            if let Some(cached) = cell.get() {
                return cached.clone();
            }
            let result = thunk().await;
            cell.settle(result)
        }
        .boxed()
    })
}

pub(crate) fn memo_exclusive<R>(thunk: Thunk<R>) -> Thunk<R>
where
    R: Fallible + Clone + Send + Sync + 'static,
{
    let cell: Arc<tokio::sync::OnceCell<R>> = Arc::new(tokio::sync::OnceCell::new());
    Arc::new(move || {
        let thunk = Arc::clone(&thunk);
        let cell = Arc::clone(&cell);
        async move {
            let initialized = cell
                .get_or_try_init(|| async move {
                    let result = thunk().await;
                    if result.is_failure() {
                        Err(result)
                    } else {
                        Ok(result)
                    }
                })
                .await;
            match initialized {
                Ok(cached) => cached.clone(),
                Err(failure) => failure,
            }
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Error, Outcome};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_settle_caches_first_success() {
        let cell = MemoCell::new();
        assert!(!cell.has_run());
        assert_eq!(cell.settle(Outcome::Success(1)), Outcome::Success(1));
        assert_eq!(cell.settle(Outcome::Success(2)), Outcome::Success(1));
        assert!(cell.has_run());
    }

    #[test]
    fn test_settle_never_caches_failure() {
        let cell: MemoCell<Outcome<i32>> = MemoCell::default();
        let failure = Outcome::Failure(Error::msg("transient"));
        assert_eq!(cell.settle(failure.clone()), failure);
        assert!(!cell.has_run());
        assert_eq!(cell.settle(Outcome::Success(5)), Outcome::Success(5));
    }

    fn counting_thunk(calls: &Arc<AtomicUsize>) -> Thunk<Outcome<usize>> {
        let calls = Arc::clone(calls);
        Arc::new(move || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            futures::future::ready(Outcome::Success(call)).boxed()
        })
    }

    #[tokio::test]
    async fn test_memo_thunk_runs_inner_thunk_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = memo(counting_thunk(&calls));

        assert_eq!(cached().await, Outcome::Success(1));
        assert_eq!(cached().await, Outcome::Success(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memo_exclusive_thunk_runs_inner_thunk_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = memo_exclusive(counting_thunk(&calls));

        assert_eq!(cached().await, Outcome::Success(1));
        assert_eq!(cached().await, Outcome::Success(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
