//! `Producer` - a re-invocable source of values.

use std::fmt;
use std::future::{Future, ready};
use std::sync::Arc;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use super::Environment;
use crate::effect::TryAsync;

type StreamFactory<A> = Arc<dyn Fn() -> BoxStream<'static, A> + Send + Sync>;

/// A re-invocable, asynchronous source of values.
///
/// A `Producer<A>` is a factory of streams: each call to
/// [`Producer::stream`] starts a fresh, independent run. Adaptors build new
/// producers without running anything; sinks such as [`Producer::collect`]
/// turn a producer into a [`TryAsync`] so it composes with the rest of the
/// effect layer.
///
/// # Examples
///
/// ```rust,ignore
/// use tryflow::control::Outcome;
/// use tryflow::pipes::Producer;
///
/// #[tokio::main]
/// async fn main() {
///     let evens = Producer::from_iter(1..=6)
///         .filter(|x| x % 2 == 0)
///         .map(|x| x * 10);
///     assert_eq!(evens.collect().await, Outcome::Success(vec![20, 40, 60]));
/// }
/// ```
pub struct Producer<A> {
    factory: StreamFactory<A>,
}

impl<A> Clone for Producer<A> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: Send + 'static> Producer<A> {
    /// Creates a producer from a stream factory, called once per run.
    pub fn from_stream<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = A> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || factory().boxed()),
        }
    }

    /// Creates a producer that yields the items of `items` on every run.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = A> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::from_stream(move || stream::iter(items.clone()))
    }

    /// A producer yielding exactly `value`.
    pub fn yield_one(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_stream(move || stream::once(ready(value.clone())))
    }

    /// A producer yielding nothing.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty::<A>)
    }

    /// Runs `computation` and yields its success value.
    ///
    /// A failed run yields nothing; the failure has already been reported to
    /// the error logger by the computation itself.
    pub fn from_try_async(computation: TryAsync<A>) -> Self {
        Self::from_stream(move || {
            stream::once(computation.run()).filter_map(|outcome| ready(outcome.ok()))
        })
    }
}

impl<A> Producer<A> {
    /// Starts a fresh run of this producer.
    pub fn stream(&self) -> BoxStream<'static, A> {
        (self.factory)()
    }
}

// =============================================================================
// Adaptors
// =============================================================================

impl<A: Send + 'static> Producer<A> {
    /// Transforms every produced item.
    pub fn map<B, F>(self, function: F) -> Producer<B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        Producer::from_stream(move || {
            let function = Arc::clone(&function);
            self.stream().map(move |item| function(item))
        })
    }

    /// Keeps the items satisfying `predicate`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        Self::from_stream(move || {
            let predicate = Arc::clone(&predicate);
            self.stream().filter(move |item| ready(predicate(item)))
        })
    }

    /// Yields every item of `self`, then every item of `next`.
    pub fn chain(self, next: Self) -> Self {
        Self::from_stream(move || self.stream().chain(next.stream()))
    }

    /// Fan-in of `producers` in this environment. See [`merge`](super::merge()).
    pub fn merge<I>(producers: I, environment: &Environment) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        super::merge(producers, environment)
    }
}

// =============================================================================
// Sinks
// =============================================================================

impl<A: Send + 'static> Producer<A> {
    /// Gathers every item of a run into a vector.
    ///
    /// A panic inside the producer surfaces as a `Failure` of the returned
    /// computation.
    pub fn collect(self) -> TryAsync<Vec<A>> {
        TryAsync::lift(move || self.stream().collect::<Vec<_>>())
    }

    /// Hands every item of a run to `consumer`.
    pub fn for_each<F>(self, consumer: F) -> TryAsync<()>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let consumer = Arc::new(consumer);
        TryAsync::lift(move || drain(self.stream(), Arc::clone(&consumer)))
    }
}

fn drain<A, F>(items: BoxStream<'static, A>, consumer: Arc<F>) -> impl Future<Output = ()> + Send
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    items.for_each(move |item| {
        consumer(item);
        ready(())
    })
}

impl<A> fmt::Display for Producer<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<Producer>")
    }
}

impl<A> fmt::Debug for Producer<A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Producer").finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Producer<i32>: Send, Sync, Clone);
