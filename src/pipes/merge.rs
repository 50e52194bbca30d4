//! Fan-in of several producers into one.
//!
//! Each run of a merged producer owns a [`MergeState`]: a lock-free queue
//! shared by one tokio task per input producer, a wake signal, and a
//! running flag cleared by a supervisor task once every input is done.
//! Input tasks only hold a weak reference to it: once the output stream is
//! dropped, the state is freed and each input stops at its next item.
//!
//! The output side alternates between draining the queue and waiting for
//! the signal, so a push that races with the emptiness check still wakes it
//! (`Notify` keeps a permit for the next waiter).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_queue::SegQueue;
use futures::StreamExt;
use futures::future::join_all;
use futures::stream::{self, Stream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::{CancellationToken, Environment, Producer};
use crate::control::Error;
use crate::effect::boundary::report;

/// Merges `producers` into a single producer.
///
/// Every run of the result starts every input concurrently and yields
/// items in the order they were enqueued. The run ends when all inputs
/// have finished and the queue is drained, or as soon as the environment's
/// token is cancelled.
///
/// Inputs are not aborted by cancellation; items still queued at that point
/// are dropped. An input that panics stops contributing: the panic is handed
/// to the error logger and the remaining inputs carry on.
///
/// # Examples
///
/// ```rust,ignore
/// use tryflow::pipes::{Environment, Producer, merge};
///
/// #[tokio::main]
/// async fn main() {
///     let merged = merge(
///         [Producer::from_iter(vec![1, 2]), Producer::from_iter(vec![10, 20])],
///         &Environment::new(),
///     );
///     let mut items = merged.collect().await.ok().unwrap();
///     items.sort_unstable();
///     assert_eq!(items, vec![1, 2, 10, 20]);
/// }
/// ```
pub fn merge<A, I>(producers: I, environment: &Environment) -> Producer<A>
where
    A: Send + 'static,
    I: IntoIterator<Item = Producer<A>>,
{
    let producers: Arc<[Producer<A>]> = producers.into_iter().collect();
    let cancellation = environment.cancellation().clone();
    Producer::from_stream(move || merged(Arc::clone(&producers), cancellation.clone()))
}

/// [`merge`] in a fresh environment that is never cancelled.
pub fn merge_all<A, I>(producers: I) -> Producer<A>
where
    A: Send + 'static,
    I: IntoIterator<Item = Producer<A>>,
{
    merge(producers, &Environment::new())
}

// =============================================================================
// Shared State
// =============================================================================

/// Per-run state shared by the input tasks and the output stream.
struct MergeState<A> {
    queue: SegQueue<A>,
    signal: Notify,
    running: AtomicBool,
}

impl<A> MergeState<A> {
    fn new() -> Self {
        let state = Self {
            queue: SegQueue::new(),
            signal: Notify::new(),
            running: AtomicBool::new(true),
        };
        // Starts signalled so the first wait falls straight through.
        state.signal.notify_one();
        state
    }

    fn enqueue(&self, item: A) {
        self.queue.push(item);
        self.signal.notify_one();
    }

    fn finish(&self) {
        self.running.store(false, Ordering::Release);
        self.signal.notify_one();
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

// =============================================================================
// Output Side
// =============================================================================

struct MergeRun<A> {
    state: Arc<MergeState<A>>,
    pending: Option<Arc<[Producer<A>]>>,
    cancellation: CancellationToken,
}

fn merged<A: Send + 'static>(
    producers: Arc<[Producer<A>]>,
    cancellation: CancellationToken,
) -> impl Stream<Item = A> + Send + 'static {
    let run = MergeRun {
        state: Arc::new(MergeState::new()),
        pending: Some(producers),
        cancellation,
    };
    stream::unfold(run, |mut run| async move {
        let item = run.next().await?;
        Some((item, run))
    })
}

impl<A: Send + 'static> MergeRun<A> {
    async fn next(&mut self) -> Option<A> {
        // Inputs start on first poll, inside the consumer's runtime.
        if let Some(producers) = self.pending.take() {
            launch(&self.state, &producers);
        }

        loop {
            if self.cancellation.is_cancelled() {
                tracing::debug!(dropped = self.state.queue.len(), "merge cancelled");
                return None;
            }
            if let Some(item) = self.state.queue.pop() {
                return Some(item);
            }
            if !self.state.is_running() {
                // Everything pushed before `finish` is visible here.
                return self.state.queue.pop();
            }
            tokio::select! {
                () = self.state.signal.notified() => {}
                () = self.cancellation.cancelled() => {}
            }
        }
    }
}

// =============================================================================
// Input Side
// =============================================================================

fn launch<A: Send + 'static>(state: &Arc<MergeState<A>>, producers: &[Producer<A>]) {
    tracing::debug!(producers = producers.len(), "merge started");

    let handles: Vec<JoinHandle<()>> = producers
        .iter()
        .map(|producer| {
            let producer = producer.clone();
            let state = Arc::downgrade(state);
            tokio::spawn(async move {
                let mut items = producer.stream();
                while let Some(item) = items.next().await {
                    // The output stream owns the only strong reference.
                    let Some(state) = state.upgrade() else {
                        tracing::debug!("merge output dropped, input stopped");
                        return;
                    };
                    state.enqueue(item);
                }
            })
        })
        .collect();

    let state = Arc::downgrade(state);
    tokio::spawn(async move {
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(join_error) = joined
                && join_error.is_panic()
            {
                let error = report(Error::from_panic(join_error.into_panic().as_ref()));
                tracing::warn!(producer = index, %error, "merge input panicked");
            }
        }
        tracing::debug!("merge inputs finished");
        if let Some(state) = state.upgrade() {
            state.finish();
        }
    });
}
