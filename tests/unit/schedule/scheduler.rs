use super::*;

/// Drive the scheduler alone, acting on every due fire the way the session does.
fn drive(s: &mut ChangeScheduler, until: u64, step: u64) -> Vec<Transition> {
    let mut log = Vec::new();
    let mut now = 0;
    s.start(Millis(now), &mut log);
    while now < until {
        now += step;
        while let Some(action) = s.pop_due(Millis(now), &mut log) {
            match action {
                FireAction::Change => s.record_change(Millis(now), &mut log),
                FireAction::Exhaust => s.exhaust(Millis(now), &mut log),
                FireAction::Restart => s.restart(Millis(now), &mut log),
            }
        }
    }
    log
}

#[test]
fn three_changes_then_exhausted() {
    let mut s = ChangeScheduler::new(3);
    let log = drive(&mut s, 3 * CHANGE_DELAY_MS, 100);
    assert_eq!(
        log,
        vec![
            Transition::Mutated { change: 1 },
            Transition::Mutated { change: 2 },
            Transition::Mutated { change: 3 },
            Transition::Exhausted,
        ]
    );
    assert_eq!(s.state().phase, SchedulerPhase::Exhausted);
    assert!(!s.state().paused);
}

#[test]
fn terminal_fire_pauses_then_restarts() {
    let mut s = ChangeScheduler::new(1);
    let end = 2 * CHANGE_DELAY_MS + RESTART_DELAY_MS;
    let log = drive(&mut s, end, 1_000);
    assert_eq!(
        log,
        vec![
            Transition::Mutated { change: 1 },
            Transition::Exhausted,
            Transition::Paused,
            Transition::Restarted,
        ]
    );
    let st = s.state();
    assert_eq!(st.change_count, 0);
    assert!(!st.paused);
    assert_eq!(st.phase, SchedulerPhase::Scheduled);
}

#[test]
fn zero_budget_never_schedules() {
    let mut s = ChangeScheduler::new(0);
    let log = drive(&mut s, 100_000, 1_000);
    assert!(log.is_empty());
    assert_eq!(s.state().phase, SchedulerPhase::Idle);
    assert_eq!(s.next_due(), None);
}

#[test]
fn manual_change_invalidates_pending_fire() {
    let mut s = ChangeScheduler::new(5);
    let mut log = Vec::new();
    s.start(Millis(0), &mut log);
    s.record_change(Millis(3_000), &mut log);

    // The fire scheduled at start is now stale.
    assert_eq!(s.pop_due(Millis(CHANGE_DELAY_MS), &mut log), None);
    assert_eq!(
        log.last(),
        Some(&Transition::Dropped {
            action: FireAction::Change
        })
    );
    assert_eq!(
        s.pop_due(Millis(3_000 + CHANGE_DELAY_MS), &mut log),
        Some(FireAction::Change)
    );
}

#[test]
fn restart_drops_fires_of_the_previous_run() {
    let mut s = ChangeScheduler::new(2);
    let mut log = Vec::new();
    s.start(Millis(0), &mut log);
    let before = s.state().epoch;
    s.restart(Millis(1), &mut log);
    assert_ne!(s.state().epoch, before);
    assert_eq!(
        s.pop_due(Millis(CHANGE_DELAY_MS), &mut log),
        None,
        "fire from before the restart must not be applied"
    );
    assert_eq!(
        s.pop_due(Millis(1 + CHANGE_DELAY_MS), &mut log),
        Some(FireAction::Change)
    );
}

#[test]
fn pause_is_idempotent() {
    let mut s = ChangeScheduler::new(1);
    s.set_paused(true);
    s.set_paused(true);
    assert!(s.state().paused);
    s.set_paused(false);
    assert!(!s.state().paused);
}

#[test]
fn change_while_paused_keeps_the_pending_restart() {
    let mut s = ChangeScheduler::new(1);
    let mut log = Vec::new();
    s.start(Millis(0), &mut log);
    let now = Millis(CHANGE_DELAY_MS);
    assert_eq!(s.pop_due(now, &mut log), Some(FireAction::Change));
    s.record_change(now, &mut log);
    let now = Millis(2 * CHANGE_DELAY_MS);
    assert_eq!(s.pop_due(now, &mut log), Some(FireAction::Exhaust));
    s.exhaust(now, &mut log);
    let epoch = s.state().epoch;

    s.set_max_changes(0);
    s.record_change(Millis(2 * CHANGE_DELAY_MS + 100), &mut log);
    let st = s.state();
    assert_eq!(st.change_count, 2);
    assert_eq!(st.epoch, epoch);
    assert_eq!(st.phase, SchedulerPhase::Paused);
    assert_eq!(
        s.pop_due(now.after(RESTART_DELAY_MS), &mut log),
        Some(FireAction::Restart)
    );
}
