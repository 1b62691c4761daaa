use crate::foundation::core::{Epoch, Millis};
use crate::schedule::queue::{FireAction, FireQueue};
use serde::Serialize;

/// Delay between a change and the next fire.
pub const CHANGE_DELAY_MS: u64 = 7_000;
/// Delay between the terminal fire and the restart.
pub const RESTART_DELAY_MS: u64 = 10_000;

/// Where the change cycle stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerPhase {
    /// Nothing pending (`maxChanges = 0`, or not started).
    Idle,
    /// A change fire is pending.
    Scheduled,
    /// The budget is spent and the terminal fire is pending.
    Exhausted,
    /// The clock is paused and the restart is pending.
    Paused,
}

/// Observable scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Changes applied since the last restart, manual ones included.
    pub change_count: u32,
    /// Whether the animation clock is paused.
    pub paused: bool,
    /// Current generation; pending fires with another epoch are stale.
    pub epoch: Epoch,
    /// Cycle phase.
    pub phase: SchedulerPhase,
}

/// Transition report handed back to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Transition {
    /// A change was applied; `change` is the new change count.
    Mutated {
        /// Change count after the change.
        change: u32,
    },
    /// The budget is spent; the terminal fire is scheduled.
    Exhausted,
    /// The terminal fire paused the clock; the restart is scheduled.
    Paused,
    /// The run restarted.
    Restarted,
    /// A fire from an older epoch was discarded.
    Dropped {
        /// Action of the discarded fire.
        action: FireAction,
    },
}

/// Timed state machine driving periodic soft changes, exhaustion, pause and restart.
///
/// The scheduler owns timing and counters only; the session performs the layer work for each
/// action and then reports back through [`Self::record_change`], [`Self::exhaust`] and
/// [`Self::restart`].
#[derive(Debug)]
pub struct ChangeScheduler {
    queue: FireQueue,
    state: RunState,
    max_changes: u32,
}

impl ChangeScheduler {
    /// Idle scheduler with a change budget.
    pub fn new(max_changes: u32) -> Self {
        Self {
            queue: FireQueue::new(),
            state: RunState {
                change_count: 0,
                paused: false,
                epoch: Epoch::default(),
                phase: SchedulerPhase::Idle,
            },
            max_changes,
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Change budget.
    pub fn max_changes(&self) -> u32 {
        self.max_changes
    }

    /// Replace the budget. Takes effect at the next scheduling decision.
    pub fn set_max_changes(&mut self, max_changes: u32) {
        self.max_changes = max_changes;
    }

    /// Delivery time of the earliest pending fire, stale ones included.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.next_due()
    }

    /// Set the pause flag. Idempotent.
    pub fn set_paused(&mut self, paused: bool) {
        self.state.paused = paused;
    }

    /// Enter the cycle.
    pub fn start(&mut self, now: Millis, log: &mut Vec<Transition>) {
        self.schedule_next(now, log);
    }

    /// Next live action due at `now`. Stale fires on the way are dropped and logged.
    pub fn pop_due(&mut self, now: Millis, log: &mut Vec<Transition>) -> Option<FireAction> {
        while let Some(fire) = self.queue.pop_due(now) {
            if fire.epoch == self.state.epoch {
                return Some(fire.action);
            }
            tracing::debug!(
                action = ?fire.action,
                fire_epoch = fire.epoch.0,
                epoch = self.state.epoch.0,
                "stale fire dropped"
            );
            log.push(Transition::Dropped {
                action: fire.action,
            });
        }
        None
    }

    /// Account for an applied change (timed or manual): count it, invalidate pending fires and
    /// schedule the next one.
    ///
    /// While paused the pending restart stays live: the change is counted and nothing else moves.
    pub fn record_change(&mut self, now: Millis, log: &mut Vec<Transition>) {
        self.state.change_count += 1;
        log.push(Transition::Mutated {
            change: self.state.change_count,
        });
        if self.state.phase == SchedulerPhase::Paused {
            return;
        }
        self.state.epoch = self.state.epoch.next();
        self.schedule_next(now, log);
    }

    /// Deliver the terminal fire: pause and schedule the restart.
    pub fn exhaust(&mut self, now: Millis, log: &mut Vec<Transition>) {
        self.state.paused = true;
        self.state.phase = SchedulerPhase::Paused;
        self.queue.push(
            now.after(RESTART_DELAY_MS),
            self.state.epoch,
            FireAction::Restart,
        );
        log.push(Transition::Paused);
    }

    /// Account for a restart: unpause, zero the count, invalidate pending fires and re-enter the
    /// cycle.
    pub fn restart(&mut self, now: Millis, log: &mut Vec<Transition>) {
        self.state.paused = false;
        self.state.change_count = 0;
        self.state.epoch = self.state.epoch.next();
        log.push(Transition::Restarted);
        self.schedule_next(now, log);
    }

    fn schedule_next(&mut self, now: Millis, log: &mut Vec<Transition>) {
        if self.max_changes == 0 {
            self.state.phase = SchedulerPhase::Idle;
            return;
        }
        let at = now.after(CHANGE_DELAY_MS);
        if self.state.change_count < self.max_changes {
            self.queue.push(at, self.state.epoch, FireAction::Change);
            self.state.phase = SchedulerPhase::Scheduled;
        } else {
            self.queue.push(at, self.state.epoch, FireAction::Exhaust);
            self.state.phase = SchedulerPhase::Exhausted;
            log.push(Transition::Exhausted);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
