use crate::foundation::core::{Epoch, Millis};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// What a deferred fire does when delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FireAction {
    /// Periodic soft change of every layer.
    Change,
    /// Terminal fire once the change budget is spent: pause, then schedule the restart.
    Exhaust,
    /// Restart the run.
    Restart,
}

/// A delivered entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fire {
    /// Scheduled delivery time.
    pub at: Millis,
    /// Scheduler generation the fire was stamped with.
    pub epoch: Epoch,
    /// Action to run.
    pub action: FireAction,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    at: Millis,
    seq: u64,
    epoch: Epoch,
    action: FireAction,
}

/// Deterministic timer queue.
///
/// Determinism rule: entries come out by `(at, insertion sequence)`, so two fires due at the same
/// instant are delivered in the order they were pushed. The queue does not judge staleness;
/// callers compare [`Fire::epoch`] against their current generation.
#[derive(Debug, Default)]
pub struct FireQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl FireQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `action` for delivery at `at`.
    pub fn push(&mut self, at: Millis, epoch: Epoch, action: FireAction) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            at,
            seq,
            epoch,
            action,
        }));
    }

    /// Pop the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<Fire> {
        if self.heap.peek()?.0.at > now {
            return None;
        }
        let Reverse(e) = self.heap.pop()?;
        Some(Fire {
            at: e.at,
            epoch: e.epoch,
            action: e.action,
        })
    }

    /// Delivery time of the earliest entry.
    pub fn next_due(&self) -> Option<Millis> {
        self.heap.peek().map(|Reverse(e)| e.at)
    }

    /// Pending entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
