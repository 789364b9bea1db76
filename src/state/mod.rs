//! Shared intersection state.
//!
//! One lock guards the lane queues and the signal record together. Every
//! operation here is a single lock acquisition held for the whole
//! read-modify-write; the cycle task never holds the lock across a sleep, so
//! foreground commands are never blocked on a sleeping background task.

pub mod queues;

pub use queues::LaneQueues;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{Lane, SignalState};

/// Everything behind the lock.
#[derive(Debug, Default)]
struct IntersectionInner {
    queues: LaneQueues,
    signal: SignalState,
}

/// The shared mutable state region: four lane queues plus the signal record.
///
/// Constructed once at startup and shared (via `Arc`) by the command surface
/// and the cycle task.
#[derive(Debug, Default)]
pub struct Intersection {
    inner: Mutex<IntersectionInner>,
}

/// Read-consistent view of the intersection for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// All waiting vehicles, lane cycle order then queue order.
    pub queue: Vec<String>,
    /// The currently green lane, if any.
    pub active: Option<Lane>,
    /// The lane green before the current transition, if any.
    pub previous: Option<Lane>,
}

/// Result of removing the front vehicle from the active lane.
#[derive(Debug, Clone, PartialEq)]
pub struct DequeueOutcome {
    /// The lane and vehicle removed, when there was one.
    pub removed: Option<(Lane, String)>,
    /// Flattened queue view after the removal.
    pub queue: Vec<String>,
}

impl Intersection {
    /// Create an intersection with empty queues and a cleared signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vehicle to `lane` and return the updated flattened view.
    pub async fn enqueue(&self, lane: Lane, vehicle: String) -> Vec<String> {
        let mut inner = self.inner.lock().await;
        inner.queues.enqueue(lane, vehicle);
        inner.queues.flatten()
    }

    /// Remove and return the front vehicle of `lane`'s queue, if any.
    pub async fn dequeue_front(&self, lane: Lane) -> Option<String> {
        let mut inner = self.inner.lock().await;
        inner.queues.dequeue_front(lane)
    }

    /// Remove the front vehicle of the currently green lane.
    ///
    /// The signal read, the pop, and the returned queue view all happen under
    /// one lock acquisition. `removed` is None when no lane is green or the
    /// green lane's queue is empty.
    pub async fn dequeue_active(&self) -> DequeueOutcome {
        let mut inner = self.inner.lock().await;
        let active = inner.signal.active;
        let removed =
            active.and_then(|lane| inner.queues.dequeue_front(lane).map(|vehicle| (lane, vehicle)));
        DequeueOutcome {
            removed,
            queue: inner.queues.flatten(),
        }
    }

    /// Read-consistent snapshot of queues and signal.
    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock().await;
        Snapshot {
            queue: inner.queues.flatten(),
            active: inner.signal.active,
            previous: inner.signal.previous,
        }
    }

    /// Empty every queue and clear the signal in one step.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.queues.clear();
        inner.signal.clear();
    }

    /// Manual signal change: previous = active, active = `lane`.
    pub async fn set_signal(&self, lane: Lane) {
        let mut inner = self.inner.lock().await;
        inner.signal.set_active(lane);
    }

    /// Yellow marker: previous = active, active = None.
    pub async fn begin_transition(&self) {
        let mut inner = self.inner.lock().await;
        inner.signal.enter_transition();
    }

    /// Green phase entry: previous = None, active = `lane`.
    pub async fn begin_green(&self, lane: Lane) {
        let mut inner = self.inner.lock().await;
        inner.signal.begin_green(lane);
    }
}
