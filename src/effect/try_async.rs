//! `TryAsync` - a re-invocable deferred asynchronous computation that may fail.
//!
//! A [`TryAsync<A>`] describes an asynchronous computation producing an
//! [`Outcome<A>`]. Nothing runs until [`TryAsync::run`] is called (or the
//! value is awaited). Every run re-executes the logic unless the
//! computation was wrapped with [`TryAsync::memo`].
//!
//! # The Boundary
//!
//! Errors returned by user logic and panics raised inside it, whether
//! while building the future or while polling it, are captured as
//! `Failure`. Running a `TryAsync` never unwinds into the caller. Each
//! captured error is also reported to the process-wide
//! [`ErrorLogger`](super::ErrorLogger).
//!
//! # Examples
//!
//! ```rust,ignore
//! use tryflow::control::{Error, Outcome};
//! use tryflow::effect::TryAsync;
//!
//! #[tokio::main]
//! async fn main() {
//!     let parsed = TryAsync::new(|| async { "42".parse::<i32>() });
//!     let doubled = parsed.map(|x| x * 2);
//!     assert_eq!(doubled.run().await, Outcome::Success(84));
//!
//!     let chained = doubled.bind(|x| {
//!         if x > 50 {
//!             TryAsync::failure(Error::msg("too large"))
//!         } else {
//!             TryAsync::success(x)
//!         }
//!     });
//!     assert_eq!(chained.await, Outcome::Failure(Error::msg("too large")));
//! }
//! ```
//!
//! # Monad Laws
//!
//! 1. **Left Identity**: `TryAsync::success(a).bind(f) == f(a)`
//! 2. **Right Identity**: `m.bind(TryAsync::success) == m`
//! 3. **Associativity**: `m.bind(f).bind(g) == m.bind(|x| f(x).bind(g))`

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
use super::try_option_async::TryOptionAsync;
use crate::control::{Error, Outcome};

/// A re-invocable deferred computation producing an [`Outcome<A>`].
///
/// Cloning is cheap: clones share the underlying logic (and, when
/// memoized, the cache).
pub struct TryAsync<A> {
    thunk: Thunk<Outcome<A>>,
}

impl<A> Clone for TryAsync<A> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: Send + 'static> TryAsync<A> {
    pub(crate) fn from_thunk<F>(thunk: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Outcome<A>> + Send + Sync + 'static,
    {
        Self {
            thunk: Arc::new(thunk),
        }
    }

    /// Creates a computation from fallible async logic.
    ///
    /// The closure is called on every run.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use tryflow::effect::TryAsync;
    ///
    /// let read = TryAsync::new(|| async { tokio::fs::read_to_string("Cargo.toml").await });
    /// ```
    pub fn new<F, Fut, E>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Self::from_thunk(move || match guard(&action) {
            Ok(future) => async move {
                match guard_future(future).await {
                    Ok(Ok(value)) => Outcome::Success(value),
                    Ok(Err(error)) => Outcome::Failure(report(Error::new(error))),
                    Err(panic) => Outcome::Failure(panic),
                }
            }
            .boxed(),
            Err(panic) => futures::future::ready(Outcome::Failure(panic)).boxed(),
        })
    }

    /// Creates a computation from async logic that can only fail by
    /// panicking.
    pub fn lift<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::from_thunk(move || match guard(&action) {
            Ok(future) => async move { Outcome::from(guard_future(future).await) }.boxed(),
            Err(panic) => futures::future::ready(Outcome::Failure(panic)).boxed(),
        })
    }

    /// A computation that always succeeds with `value`.
    pub fn success(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_thunk(move || futures::future::ready(Outcome::Success(value.clone())).boxed())
    }

    /// A computation that always fails with `error`.
    pub fn failure(error: impl Into<Error>) -> Self {
        let error = error.into();
        Self::from_thunk(move || futures::future::ready(Outcome::Failure(error.clone())).boxed())
    }

    /// A computation that always yields `outcome`.
    pub fn from_outcome(outcome: Outcome<A>) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_thunk(move || futures::future::ready(outcome.clone()).boxed())
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A> TryAsync<A> {
    /// Runs the computation once.
    ///
    /// The returned future never panics because of user logic.
    pub fn run(&self) -> BoxFuture<'static, Outcome<A>> {
        (self.thunk)()
    }
}

impl<A> IntoFuture for TryAsync<A> {
    type Output = Outcome<A>;
    type IntoFuture = BoxFuture<'static, Outcome<A>>;

    fn into_future(self) -> Self::IntoFuture {
        self.run()
    }
}

// =============================================================================
// Functor / Monad Operations
// =============================================================================

impl<A: Send + 'static> TryAsync<A> {
    /// Transforms the success value. Not called on `Failure`.
    ///
    /// A panic inside `function` becomes a `Failure`.
    pub fn map<B, F>(self, function: F) -> TryAsync<B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        TryAsync::from_thunk(move || {
            let source = self.clone();
            let function = Arc::clone(&function);
            async move {
                match source.run().await {
                    Outcome::Success(value) => Outcome::from(guard(|| function(value))),
                    Outcome::Failure(error) => Outcome::Failure(error),
                }
            }
            .boxed()
        })
    }

    /// Transforms the error of a `Failure`.
    #[must_use]
    pub fn map_failure<F>(self, function: F) -> Self
    where
        F: Fn(Error) -> Error + Send + Sync + 'static,
    {
        let function = Arc::new(function);
        Self::from_thunk(move || {
            let source = self.clone();
            let function = Arc::clone(&function);
            async move {
                match source.run().await {
                    Outcome::Success(value) => Outcome::Success(value),
                    Outcome::Failure(error) => match guard(|| function(error)) {
                        Ok(mapped) | Err(mapped) => Outcome::Failure(mapped),
                    },
                }
            }
            .boxed()
        })
    }

    /// Sequences a dependent computation.
    ///
    /// `function` runs only after `self` succeeds; a `Failure` short-circuits
    /// and is propagated unchanged.
    pub fn bind<B, F>(self, function: F) -> TryAsync<B>
    where
        F: Fn(A) -> TryAsync<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        TryAsync::from_thunk(move || {
            let source = self.clone();
            let function = Arc::clone(&function);
            async move {
                match source.run().await {
                    Outcome::Success(value) => match guard(|| function(value)) {
                        Ok(next) => next.run().await,
                        Err(panic) => Outcome::Failure(panic),
                    },
                    Outcome::Failure(error) => Outcome::Failure(error),
                }
            }
            .boxed()
        })
    }

    /// Alias for [`TryAsync::bind`].
    pub fn and_then<B, F>(self, function: F) -> TryAsync<B>
    where
        F: Fn(A) -> TryAsync<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.bind(function)
    }

    /// Projects both states into a successful computation.
    pub fn bi_map<B, S, F>(self, on_success: S, on_failure: F) -> TryAsync<B>
    where
        S: Fn(A) -> B + Send + Sync + 'static,
        F: Fn(Error) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let handlers = Arc::new((on_success, on_failure));
        TryAsync::from_thunk(move || {
            let source = self.clone();
            let handlers = Arc::clone(&handlers);
            async move {
                let (on_success, on_failure) = handlers.as_ref();
                match source.run().await {
                    Outcome::Success(value) => Outcome::from(guard(|| on_success(value))),
                    Outcome::Failure(error) => Outcome::from(guard(|| on_failure(error))),
                }
            }
            .boxed()
        })
    }

    /// Turns a success rejected by `predicate` into `Failure(Error::Bottom)`.
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
                    Outcome::Success(value) => match guard(|| predicate(&value)) {
                        Ok(true) => Outcome::Success(value),
                        Ok(false) => Outcome::Failure(Error::Bottom),
                        Err(panic) => Outcome::Failure(panic),
                    },
                    failure @ Outcome::Failure(_) => failure,
                }
            }
            .boxed()
        })
    }

    /// Runs `other` when `self` fails.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::from_thunk(move || {
            let source = self.clone();
            let other = other.clone();
            async move {
                match source.run().await {
                    Outcome::Success(value) => Outcome::Success(value),
                    Outcome::Failure(_) => other.run().await,
                }
            }
            .boxed()
        })
    }

    /// Runs both computations concurrently and combines them when their
    /// keys match.
    ///
    /// The first failure (checking `self` first) is propagated. When both
    /// succeed but the keys differ the result is `Failure(Error::InvalidJoin)`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use tryflow::control::{Error, Outcome};
    /// use tryflow::effect::TryAsync;
    ///
    /// let user = TryAsync::success((1, "ada"));
    /// let order = TryAsync::success((1, 250));
    /// let joined = user.join(order, |u| u.0, |o| o.0, |u, o| (u.1, o.1));
    /// assert_eq!(joined.run().await, Outcome::Success(("ada", 250)));
    /// ```
    pub fn join<B, K, C, KA, KB, P>(
        self,
        other: TryAsync<B>,
        key_self: KA,
        key_other: KB,
        project: P,
    ) -> TryAsync<C>
    where
        B: Send + 'static,
        C: Send + 'static,
        K: PartialEq,
        KA: Fn(&A) -> K + Send + Sync + 'static,
        KB: Fn(&B) -> K + Send + Sync + 'static,
        P: Fn(A, B) -> C + Send + Sync + 'static,
    {
        let functions = Arc::new((key_self, key_other, project));
        TryAsync::from_thunk(move || {
            let left = self.run();
            let right = other.run();
            let functions = Arc::clone(&functions);
            async move {
                let (key_self, key_other, project) = functions.as_ref();
                match futures::future::join(left, right).await {
                    (Outcome::Success(a), Outcome::Success(b)) => {
                        match guard(|| key_self(&a) == key_other(&b)) {
                            Ok(true) => Outcome::from(guard(|| project(a, b))),
                            Ok(false) => Outcome::Failure(Error::InvalidJoin),
                            Err(panic) => Outcome::Failure(panic),
                        }
                    }
                    (Outcome::Failure(error), _) | (_, Outcome::Failure(error)) => {
                        Outcome::Failure(error)
                    }
                }
            }
            .boxed()
        })
    }

    /// Widens into an optional computation; success becomes `Some`.
    pub fn to_option(self) -> TryOptionAsync<A> {
        TryOptionAsync::from_thunk(move || {
            let source = self.clone();
            async move { source.run().await.into_option_outcome() }.boxed()
        })
    }
}

// =============================================================================
// Projections
// =============================================================================

impl<A: Send + 'static> TryAsync<A> {
    /// Runs the computation and projects the outcome.
    ///
    /// Exactly one handler is invoked. Handlers return anything that
    /// implements [`IntoProjection`], so synchronous and suspending handlers
    /// go through the same path.
    pub async fn match_with<R, S, SR, F, FR>(&self, on_success: S, on_failure: F) -> R
    where
        S: FnOnce(A) -> SR,
        SR: IntoProjection<Output = R>,
        F: FnOnce(Error) -> FR,
        FR: IntoProjection<Output = R>,
    {
        match self.run().await {
            Outcome::Success(value) => on_success(value).into_projection().await,
            Outcome::Failure(error) => on_failure(error).into_projection().await,
        }
    }

    /// Runs the computation and folds a success into `state`.
    ///
    /// A `Failure` leaves `state` unchanged.
    pub async fn fold<S, F>(&self, state: S, function: F) -> S
    where
        F: FnOnce(S, A) -> S,
    {
        match self.run().await {
            Outcome::Success(value) => function(state, value),
            Outcome::Failure(_) => state,
        }
    }

    /// Runs the computation, substituting `default` on failure.
    pub async fn if_fail(&self, default: A) -> A {
        self.run().await.if_fail(default)
    }

    /// Runs the computation, computing a substitute from the error.
    pub async fn if_fail_with<F>(&self, function: F) -> A
    where
        F: FnOnce(Error) -> A,
    {
        self.run().await.if_fail_with(function)
    }
}

// =============================================================================
// Memoization and Retry
// =============================================================================

impl<A: Clone + Send + Sync + 'static> TryAsync<A> {
    /// Caches the first success; later runs return it without re-running
    /// the logic.
    ///
    /// Failures are not cached. Concurrent first runs are not mutually
    /// exclusive and may each execute the logic; use
    /// [`TryAsync::memo_exclusive`] when that matters.
    #[must_use]
    pub fn memo(self) -> Self {
        Self {
            thunk: memo(self.thunk),
        }
    }

    /// Like [`TryAsync::memo`], but concurrent first runs wait for each
    /// other so the logic succeeds at most once.
    #[must_use]
    pub fn memo_exclusive(self) -> Self {
        Self {
            thunk: memo_exclusive(self.thunk),
        }
    }
}

impl<A: Send + 'static> TryAsync<A> {
    /// Runs up to `attempts` times until success; returns the last
    /// failure otherwise.
    #[must_use]
    pub fn retry(self, attempts: usize) -> Self {
        self.retry_with(Schedule::immediate(attempts))
    }

    /// Like [`TryAsync::retry`], waiting `initial_delay` before the first
    /// retry and doubling the wait before each subsequent one.
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

impl<A: Send + 'static> From<TryOptionAsync<A>> for TryAsync<A> {
    fn from(computation: TryOptionAsync<A>) -> Self {
        computation.to_try()
    }
}

impl<A> fmt::Display for TryAsync<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<TryAsync>")
    }
}

impl<A> fmt::Debug for TryAsync<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("TryAsync").finish_non_exhaustive()
    }
}

impl<A: Send + 'static> IntoProjection for TryAsync<A> {
    type Output = Outcome<A>;
    type Future = BoxFuture<'static, Outcome<A>>;

    fn into_projection(self) -> Self::Future {
        self.run()
    }
}

static_assertions::assert_impl_all!(TryAsync<i32>: Send, Sync, Clone);
