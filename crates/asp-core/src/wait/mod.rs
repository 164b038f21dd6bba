//! Bounded wait over already-running operations.
//!
//! [`aggregate`] observes a set of spawned operations and resolves exactly once:
//! when every operation succeeded, when any of them failed, or when the deadline
//! fired, whichever comes first. Operations are never cancelled; once the
//! aggregation resolves, their outcomes are simply no longer observed.
mod error;
pub use error::AggregateError;

mod latch;
use latch::Latch;

use std::{
    future::Future,
    mem,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use asp_model::Flag;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, instrument, trace};

/// An already-started unit of asynchronous work.
///
/// Wraps the [`JoinHandle`] of a spawned task. Dropping it detaches the task
/// instead of cancelling it.
#[derive(Debug)]
pub struct PendingOperation<T, E> {
    handle: JoinHandle<Result<T, E>>,
}

impl<T, E> PendingOperation<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Spawn `fut` on the current runtime and track it.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(fut),
        }
    }
}

impl<T, E> PendingOperation<T, E> {
    /// Returns `true` once the underlying task has settled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T, E> From<JoinHandle<Result<T, E>>> for PendingOperation<T, E> {
    fn from(handle: JoinHandle<Result<T, E>>) -> Self {
        Self { handle }
    }
}

/// What to do when the deadline fires before every operation finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartialResolution {
    /// Return the slots filled so far.
    #[default]
    Resolve,
    /// Fail with [`AggregateError::Timeout`].
    Reject,
}

impl From<Flag> for PartialResolution {
    fn from(flag: Flag) -> Self {
        if flag.is_enabled() {
            Self::Resolve
        } else {
            Self::Reject
        }
    }
}

/// Results of a bounded wait, positionally aligned with the input operations.
///
/// `None` marks an operation that had not finished when the deadline fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation<T> {
    slots: Vec<Option<T>>,
}

impl<T> Aggregation<T> {
    fn new(slots: Vec<Option<T>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of filled slots.
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns `true` if every operation finished in time.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Option<T>> {
        self.slots
    }

    /// All values, or `None` if any slot is unresolved.
    pub fn into_values(self) -> Option<Vec<T>> {
        self.slots.into_iter().collect()
    }
}

impl<T> IntoIterator for Aggregation<T> {
    type Item = Option<T>;
    type IntoIter = std::vec::IntoIter<Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

type Outcome<T, E> = Result<Aggregation<T>, AggregateError<E>>;

/// State shared between the waiting caller, the observers and the timer.
struct Shared<T, E> {
    total: usize,
    slots: Mutex<Vec<Option<T>>>,
    completed: AtomicUsize,
    latch: Latch<Outcome<T, E>>,
}

impl<T, E> Shared<T, E> {
    fn lock_slots(&self) -> MutexGuard<'_, Vec<Option<T>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand out the current slots, leaving a fresh unresolved set behind so
    /// late writers still have somewhere to land.
    fn take_slots(&self, slots: &mut Vec<Option<T>>) -> Aggregation<T> {
        Aggregation::new(mem::replace(slots, unresolved(self.total)))
    }

    fn on_settled(&self, index: usize, outcome: Result<Result<T, E>, JoinError>) {
        if self.latch.is_fired() {
            trace!(index, "operation settled after resolution; ignored");
            return;
        }

        match outcome {
            Ok(Ok(value)) => {
                let done = {
                    let mut slots = self.lock_slots();
                    slots[index] = Some(value);
                    self.completed.fetch_add(1, Ordering::AcqRel) + 1
                };
                trace!(index, done, total = self.total, "operation completed");

                if done == self.total {
                    self.latch.fire(|| {
                        let mut slots = self.lock_slots();
                        Ok(self.take_slots(&mut slots))
                    });
                }
            }
            Ok(Err(source)) => {
                if self.latch.fire(|| Err(AggregateError::Operation { index, source })) {
                    debug!(index, "operation failed; aggregation aborted");
                }
            }
            Err(join) => {
                let reason = join.to_string();
                if self.latch.fire(|| Err(AggregateError::Join { index, reason })) {
                    debug!(index, "operation did not finish; aggregation aborted");
                }
            }
        }
    }

    fn on_deadline(&self, policy: PartialResolution) {
        self.latch.fire(|| {
            let mut slots = self.lock_slots();
            let completed = self.completed.load(Ordering::Acquire);
            debug!(completed, total = self.total, ?policy, "deadline reached");

            if completed == self.total || policy == PartialResolution::Resolve {
                Ok(self.take_slots(&mut slots))
            } else {
                Err(AggregateError::Timeout {
                    completed,
                    total: self.total,
                })
            }
        });
    }
}

fn unresolved<T>(n: usize) -> Vec<Option<T>> {
    std::iter::repeat_with(|| None).take(n).collect()
}

/// Wait for all `operations` to succeed, or until `timeout` elapses.
///
/// Resolution happens once, at the first of:
/// - every operation succeeded: all slots are filled;
/// - an operation failed: its error is returned immediately;
/// - the deadline fired: the filled-so-far slots are returned under
///   [`PartialResolution::Resolve`], or [`AggregateError::Timeout`] under
///   [`PartialResolution::Reject`].
///
/// Observers are spawned before the timer, so with a zero `timeout` on a
/// current-thread runtime, operations that already finished are still counted.
/// An empty input resolves immediately with an empty result.
///
/// Must be called from within a tokio runtime.
#[instrument(level = "debug", skip(operations), fields(total = operations.len()))]
pub async fn aggregate<T, E>(
    operations: Vec<PendingOperation<T, E>>,
    timeout: Duration,
    policy: PartialResolution,
) -> Result<Aggregation<T>, AggregateError<E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    let total = operations.len();
    if total == 0 {
        return Ok(Aggregation::new(Vec::new()));
    }

    let (latch, resolved) = Latch::new();
    let shared = Arc::new(Shared {
        total,
        slots: Mutex::new(unresolved(total)),
        completed: AtomicUsize::new(0),
        latch,
    });

    for (index, op) in operations.into_iter().enumerate() {
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            let outcome = op.handle.await;
            shared.on_settled(index, outcome);
        });
    }

    let timer = {
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            shared.on_deadline(policy);
        })
    };

    let outcome = resolved.await;
    timer.abort();

    match outcome {
        Ok(outcome) => outcome,
        Err(_) => Err(AggregateError::Interrupted),
    }
}
