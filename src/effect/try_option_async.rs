//! `TryOptionAsync` - a re-invocable deferred computation that may fail or
//! yield nothing.
//!
//! A [`TryOptionAsync<A>`] produces an [`OptionOutcome<A>`]: `Some(A)`,
//! `None` or `Failure(Error)`. Combinators short-circuit on both `None` and
//! `Failure`; retry and memoization treat `None` as a terminal result.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tryflow::control::OptionOutcome;
//! use tryflow::effect::TryOptionAsync;
//!
//! #[tokio::main]
//! async fn main() {
//!     let lookup = TryOptionAsync::lift(|| async { std::env::var("HOME").ok() });
//!     let length = lookup.map(|home| home.len());
//!     match length.run().await {
//!         OptionOutcome::Some(length) => println!("{length}"),
//!         OptionOutcome::None => println!("unset"),
//!         OptionOutcome::Failure(error) => println!("{error}"),
//!     }
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::boundary::{Thunk, guard, guard_future, report};
use super::memo::{memo, memo_exclusive};
use super::projection::IntoProjection;
use super::schedule::{Schedule, retry};
use super::try_async::TryAsync;
use crate::control::{Error, OptionOutcome, Outcome};

/// A re-invocable deferred computation producing an [`OptionOutcome<A>`].
pub struct TryOptionAsync<A> {
    thunk: Thunk<OptionOutcome<A>>,
}

impl<A> Clone for TryOptionAsync<A> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: Send + 'static> TryOptionAsync<A> {
    pub(crate) fn from_thunk<F>(thunk: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, OptionOutcome<A>> + Send + Sync + 'static,
    {
        Self {
            thunk: Arc::new(thunk),
        }
    }

    /// Creates a computation from fallible, optional async logic.
    pub fn new<F, Fut, E>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<A>, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Self::from_thunk(move || match guard(&action) {
            Ok(future) => async move {
                match guard_future(future).await {
                    Ok(Ok(option)) => OptionOutcome::from(option),
                    Ok(Err(error)) => OptionOutcome::Failure(report(Error::new(error))),
                    Err(panic) => OptionOutcome::Failure(panic),
                }
            }
            .boxed(),
            Err(panic) => futures::future::ready(OptionOutcome::Failure(panic)).boxed(),
        })
    }

    /// Creates a computation from optional async logic that can only fail
    /// by panicking.
    pub fn lift<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<A>> + Send + 'static,
    {
        Self::from_thunk(move || match guard(&action) {
            Ok(future) => async move {
                match guard_future(future).await {
                    Ok(option) => OptionOutcome::from(option),
                    Err(panic) => OptionOutcome::Failure(panic),
                }
            }
            .boxed(),
            Err(panic) => futures::future::ready(OptionOutcome::Failure(panic)).boxed(),
        })
    }

    /// A computation that always yields `Some(value)`.
    pub fn some(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_thunk(move || futures::future::ready(OptionOutcome::Some(value.clone())).boxed())
    }

    /// A computation that always yields `None`.
    pub fn none() -> Self {
        Self::from_thunk(|| futures::future::ready(OptionOutcome::None).boxed())
    }

    /// A computation that always fails with `error`.
    pub fn failure(error: impl Into<Error>) -> Self {
        let error = error.into();
        Self::from_thunk(move || {
            futures::future::ready(OptionOutcome::Failure(error.clone())).boxed()
        })
    }

    /// A computation that always yields `outcome`.
    pub fn from_outcome(outcome: OptionOutcome<A>) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_thunk(move || futures::future::ready(outcome.clone()).boxed())
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A> TryOptionAsync<A> {
    /// Runs the computation once.
    pub fn run(&self) -> BoxFuture<'static, OptionOutcome<A>> {
        (self.thunk)()
    }
}

impl<A> IntoFuture for TryOptionAsync<A> {
    type Output = OptionOutcome<A>;
    type IntoFuture = BoxFuture<'static, OptionOutcome<A>>;

    fn into_future(self) -> Self::IntoFuture {
        self.run()
    }
}

// =============================================================================
// Functor / Monad Operations
// =============================================================================

impl<A: Send + 'static> TryOptionAsync<A> {
    /// Transforms the `Some` value; `None` and `Failure` pass through.
    pub fn map<B, F>(self, function: F) -> TryOptionAsync<B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        TryOptionAsync::from_thunk(move || {
            let source = self.clone();
            let function = Arc::clone(&function);
            async move {
                match source.run().await {
                    OptionOutcome::Some(value) => match guard(|| function(value)) {
                        Ok(mapped) => OptionOutcome::Some(mapped),
                        Err(panic) => OptionOutcome::Failure(panic),
                    },
                    OptionOutcome::None => OptionOutcome::None,
                    OptionOutcome::Failure(error) => OptionOutcome::Failure(error),
                }
            }
            .boxed()
        })
    }

    /// Sequences a dependent computation; runs `function` only on `Some`.
    pub fn bind<B, F>(self, function: F) -> TryOptionAsync<B>
    where
        F: Fn(A) -> TryOptionAsync<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        TryOptionAsync::from_thunk(move || {
            let source = self.clone();
            let function = Arc::clone(&function);
            async move {
                match source.run().await {
                    OptionOutcome::Some(value) => match guard(|| function(value)) {
                        Ok(next) => next.run().await,
                        Err(panic) => OptionOutcome::Failure(panic),
                    },
                    OptionOutcome::None => OptionOutcome::None,
                    OptionOutcome::Failure(error) => OptionOutcome::Failure(error),
                }
            }
            .boxed()
        })
    }

    /// Alias for [`TryOptionAsync::bind`].
    pub fn and_then<B, F>(self, function: F) -> TryOptionAsync<B>
    where
        F: Fn(A) -> TryOptionAsync<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.bind(function)
    }

    /// Projects all three states into a successful computation.
    pub fn tri_map<B, S, N, F>(self, on_some: S, on_none: N, on_failure: F) -> TryAsync<B>
    where
        S: Fn(A) -> B + Send + Sync + 'static,
        N: Fn() -> B + Send + Sync + 'static,
        F: Fn(Error) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let handlers = Arc::new((on_some, on_none, on_failure));
        TryAsync::from_thunk(move || {
            let source = self.clone();
            let handlers = Arc::clone(&handlers);
            async move {
                let (on_some, on_none, on_failure) = handlers.as_ref();
                let projected = match source.run().await {
                    OptionOutcome::Some(value) => guard(|| on_some(value)),
                    OptionOutcome::None => guard(on_none),
                    OptionOutcome::Failure(error) => guard(|| on_failure(error)),
                };
                Outcome::from(projected)
            }
            .boxed()
        })
    }

    /// Turns a `Some` rejected by `predicate` into `None`.
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        Self::from_thunk(move || {
            let source = self.clone();
            let predicate = Arc::clone(&predicate);
            async move {
                match source.run().await {
                    OptionOutcome::Some(value) => match guard(|| predicate(&value)) {
                        Ok(true) => OptionOutcome::Some(value),
                        Ok(false) => OptionOutcome::None,
                        Err(panic) => OptionOutcome::Failure(panic),
                    },
                    other => other,
                }
            }
            .boxed()
        })
    }

    /// Runs `other` when `self` yields `None` or fails.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::from_thunk(move || {
            let source = self.clone();
            let other = other.clone();
            async move {
                match source.run().await {
                    OptionOutcome::Some(value) => OptionOutcome::Some(value),
                    OptionOutcome::None | OptionOutcome::Failure(_) => other.run().await,
                }
            }
            .boxed()
        })
    }

    /// Runs both computations concurrently and combines them when their
    /// keys match.
    ///
    /// A `Failure` on either side wins over `None`; `None` on either side
    /// yields `None`; mismatched keys yield `Failure(Error::InvalidJoin)`.
    pub fn join<B, K, C, KA, KB, P>(
        self,
        other: TryOptionAsync<B>,
        key_self: KA,
        key_other: KB,
        project: P,
    ) -> TryOptionAsync<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        K: PartialEq,
        KA: Fn(&A) -> K + Send + Sync + 'static,
        KB: Fn(&B) -> K + Send + Sync + 'static,
        P: Fn(A, B) -> C + Send + Sync + 'static,
    {
        let functions = Arc::new((key_self, key_other, project));
        TryOptionAsync::from_thunk(move || {
            let left = self.run();
            let right = other.run();
            let functions = Arc::clone(&functions);
            async move {
                let (key_self, key_other, project) = functions.as_ref();
                match futures::future::join(left, right).await {
                    (OptionOutcome::Some(a), OptionOutcome::Some(b)) => {
                        match guard(|| key_self(&a) == key_other(&b)) {
                            Ok(true) => match guard(|| project(a, b)) {
                                Ok(joined) => OptionOutcome::Some(joined),
                                Err(panic) => OptionOutcome::Failure(panic),
                            },
                            Ok(false) => OptionOutcome::Failure(Error::InvalidJoin),
                            Err(panic) => OptionOutcome::Failure(panic),
                        }
                    }
                    (OptionOutcome::Failure(error), _) | (_, OptionOutcome::Failure(error)) => {
                        OptionOutcome::Failure(error)
                    }
                    _ => OptionOutcome::None,
                }
            }
            .boxed()
        })
    }

    /// Narrows into a plain fallible computation; `None` becomes
    /// `Failure(Error::Bottom)`.
    pub fn to_try(self) -> TryAsync<A> {
        TryAsync::from_thunk(move || {
            let source = self.clone();
            async move { source.run().await.into_outcome() }.boxed()
        })
    }
}

// =============================================================================
// Projections
// =============================================================================

impl<A: Send + 'static> TryOptionAsync<A> {
    /// Runs the computation and projects the outcome; exactly one handler
    /// is invoked.
    pub async fn match_with<R, S, SR, N, NR, F, FR>(
        &self,
        on_some: S,
        on_none: N,
        on_failure: F,
    ) -> R
    where
        S: FnOnce(A) -> SR,
        SR: IntoProjection<Output = R>,
        N: FnOnce() -> NR,
        NR: IntoProjection<Output = R>,
        F: FnOnce(Error) -> FR,
        FR: IntoProjection<Output = R>,
    {
        match self.run().await {
            OptionOutcome::Some(value) => on_some(value).into_projection().await,
            OptionOutcome::None => on_none().into_projection().await,
            OptionOutcome::Failure(error) => on_failure(error).into_projection().await,
        }
    }

    /// Runs the computation and folds a `Some` into `state`.
    pub async fn fold<S, F>(&self, state: S, function: F) -> S
    where
        F: FnOnce(S, A) -> S,
    {
        match self.run().await {
            OptionOutcome::Some(value) => function(state, value),
            OptionOutcome::None | OptionOutcome::Failure(_) => state,
        }
    }

    /// Runs the computation, substituting `default` on `None` or failure.
    pub async fn if_none_or_fail(&self, default: A) -> A {
        self.run().await.if_none_or_fail(default)
    }
}

// =============================================================================
// Memoization and Retry
// =============================================================================

impl<A: Clone + Send + Sync + 'static> TryOptionAsync<A> {
    /// Caches the first `Some` or `None`. See [`TryAsync::memo`].
    #[must_use]
    pub fn memo(self) -> Self {
        Self {
            thunk: memo(self.thunk),
        }
    }

    /// Caches the first `Some` or `None`, serializing first runs.
    /// See [`TryAsync::memo_exclusive`].
    #[must_use]
    pub fn memo_exclusive(self) -> Self {
        Self {
            thunk: memo_exclusive(self.thunk),
        }
    }
}

impl<A: Send + 'static> TryOptionAsync<A> {
    /// Runs up to `attempts` times until `Some` or `None`.
    #[must_use]
    pub fn retry(self, attempts: usize) -> Self {
        self.retry_with(Schedule::immediate(attempts))
    }

    /// Like [`TryOptionAsync::retry`] with exponential backoff.
    #[must_use]
    pub fn retry_backoff(self, initial_delay: Duration, attempts: usize) -> Self {
        self.retry_with(Schedule::exponential(initial_delay, attempts))
    }

    /// Retries according to `schedule`.
    #[must_use]
    pub fn retry_with(self, schedule: Schedule) -> Self {
        Self {
            thunk: retry(self.thunk, schedule),
        }
    }
}

impl<A: Send + 'static> From<TryAsync<A>> for TryOptionAsync<A> {
    fn from(computation: TryAsync<A>) -> Self {
        computation.to_option()
    }
}

impl<A> fmt::Display for TryOptionAsync<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<TryOptionAsync>")
    }
}

impl<A> fmt::Debug for TryOptionAsync<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("TryOptionAsync").finish_non_exhaustive()
    }
}

impl<A: Send + 'static> IntoProjection for TryOptionAsync<A> {
    type Output = OptionOutcome<A>;
    type Future = BoxFuture<'static, OptionOutcome<A>>;

    fn into_projection(self) -> Self::Future {
        self.run()
    }
}

static_assertions::assert_impl_all!(TryOptionAsync<String>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("lookup failed")]
    struct LookupFailed;

    #[tokio::test]
    async fn test_new_maps_all_three_states() {
        let some = TryOptionAsync::new(|| async { Ok::<_, LookupFailed>(Some(1)) });
        let none = TryOptionAsync::new(|| async { Ok::<Option<i32>, LookupFailed>(None) });
        let failed = TryOptionAsync::new(|| async { Err::<Option<i32>, _>(LookupFailed) });

        assert_eq!(some.run().await, OptionOutcome::Some(1));
        assert_eq!(none.run().await, OptionOutcome::None);
        assert!(failed.run().await.is_failure());
    }

    #[tokio::test]
    async fn test_bind_short_circuits_on_none() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let chained = TryOptionAsync::<i32>::none().bind(move |x| {
            calls_clone.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            TryOptionAsync::some(x + 1)
        });
        assert_eq!(chained.run().await, OptionOutcome::None);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tri_map() {
        let describe = |computation: TryOptionAsync<i32>| {
            computation.tri_map(
                |x| format!("some {x}"),
                || "none".to_string(),
                |error| format!("fail {error}"),
            )
        };
        assert_eq!(
            describe(TryOptionAsync::some(1)).run().await,
            Outcome::Success("some 1".to_string())
        );
        assert_eq!(
            describe(TryOptionAsync::none()).run().await,
            Outcome::Success("none".to_string())
        );
        assert_eq!(
            describe(TryOptionAsync::failure("x")).run().await,
            Outcome::Success("fail x".to_string())
        );
    }

    #[tokio::test]
    async fn test_filter_turns_rejection_into_none() {
        let filtered = TryOptionAsync::some(2).filter(|x| *x > 2);
        assert_eq!(filtered.run().await, OptionOutcome::None);
    }

    #[tokio::test]
    async fn test_or_on_none() {
        let combined = TryOptionAsync::none().or(TryOptionAsync::some(9));
        assert_eq!(combined.run().await, OptionOutcome::Some(9));
    }

    #[tokio::test]
    async fn test_match_with_three_handlers() {
        let computation = TryOptionAsync::<i32>::none();
        let text = computation
            .match_with(|x| x.to_string(), || "nothing".to_string(), |e| e.to_string())
            .await;
        assert_eq!(text, "nothing");
    }

    #[tokio::test]
    async fn test_to_try_maps_none_to_bottom() {
        let narrowed = TryOptionAsync::<i32>::none().to_try();
        assert_eq!(narrowed.run().await, Outcome::Failure(Error::Bottom));
    }

    #[tokio::test]
    async fn test_if_none_or_fail_and_fold() {
        assert_eq!(TryOptionAsync::<i32>::none().if_none_or_fail(5).await, 5);
        assert_eq!(TryOptionAsync::some(2).fold(1, |state, x| state * x).await, 2);
    }
}
