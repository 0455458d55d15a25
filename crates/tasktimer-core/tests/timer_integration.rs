//! Integration tests for a full task-timer run.
//!
//! These tests drive a session end to end: text persisted in SQLite,
//! parsed on play, counted down by a manual clock, advanced on expiry.

use std::time::Duration;

use tasktimer_core::storage::{Store, TASKS_KEY};
use tasktimer_core::timer::ALL_TASKS_COMPLETED;
use tasktimer_core::{
    Database, Event, ManualClock, ManualScheduler, MemoryNotifier, Session, TimerEngine,
    TimerState,
};

type TestSession = Session<Database, ManualScheduler, MemoryNotifier, ManualClock>;

fn open_session(saved: &str) -> (TestSession, ManualClock) {
    let mut db = Database::open_memory().unwrap();
    db.set(TASKS_KEY, saved).unwrap();
    let clock = ManualClock::new(1_000_000);
    let engine = TimerEngine::new(ManualScheduler::new(), MemoryNotifier::new(), clock.clone());
    (Session::open(db, engine).unwrap(), clock)
}

/// Deliver one tick per second of wall time, like a real interval would.
fn run_for(session: &mut TestSession, clock: &ManualClock, secs: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..secs {
        clock.advance(Duration::from_secs(1));
        let Some(id) = session.engine().countdown_id() else {
            break;
        };
        events.extend(session.engine_mut().tick(id));
    }
    events
}

#[test]
fn test_full_run_through_queue() {
    let (mut session, clock) = open_session("- [ ] Plan 1\n- [x] Work 1r2\n\nReview 2");
    assert!(session.play().is_some());
    assert_eq!(session.engine().tasks().len(), 4);
    assert_eq!(
        session.store().get(TASKS_KEY).unwrap().as_deref(),
        Some("Plan 1\nWork 1r2\n\nReview 2")
    );

    let events = run_for(&mut session, &clock, 60 + 60 + 60 + 120);
    let advanced = events
        .iter()
        .filter(|e| matches!(e, Event::TaskAdvanced { .. }))
        .count();
    let completed = events
        .iter()
        .filter(|e| matches!(e, Event::AllTasksCompleted { .. }))
        .count();
    assert_eq!(advanced, 3);
    assert_eq!(completed, 1);

    let engine = session.engine();
    assert!(engine.completed_all_tasks());
    assert_eq!(engine.task_index(), 4);
    assert_eq!(engine.clock_label(), "00:00");
    assert_eq!(
        engine.notifier().messages(),
        &[
            "\"Plan\" completed, \"Work (1)\" started for 1 minute".to_string(),
            "\"Work (1)\" completed, \"Work (2)\" started for 1 minute".to_string(),
            "\"Work (2)\" completed, \"Review\" started for 2 minutes".to_string(),
            ALL_TASKS_COMPLETED.to_string(),
        ]
    );
    assert!(engine.scheduler().live().is_empty());
}

#[test]
fn test_late_ticks_catch_up_with_wall_time() {
    let (mut session, clock) = open_session("Focus 10");
    session.play();

    // The event loop stalls for 42.6s, then a single tick arrives.
    clock.advance(Duration::from_millis(42_600));
    let id = session.engine().countdown_id().unwrap();
    assert!(session.engine_mut().tick(id).is_none());
    assert_eq!(session.engine().remaining_secs(), 600 - 42);
    assert_eq!(session.engine().clock_label(), "09:18");
}

#[test]
fn test_restore_after_completion_resumes_last_task() {
    let (mut session, clock) = open_session("Write 1\nEdit 1");
    session.play();
    run_for(&mut session, &clock, 120);
    assert!(session.engine().completed_all_tasks());

    session.engine_mut().restore_ten_percent();
    assert_eq!(session.engine().state(), TimerState::Running);
    assert_eq!(session.engine().current_task_label().as_deref(), Some("Edit"));
    assert_eq!(session.engine().remaining_secs(), 6);

    run_for(&mut session, &clock, 6);
    assert!(session.engine().completed_all_tasks());
}

#[test]
fn test_editing_while_running_pauses_then_replay_picks_up_changes() {
    let (mut session, clock) = open_session("Write 5");
    session.play();
    run_for(&mut session, &clock, 30);

    session.append_task_line("Walk 2");
    assert_eq!(session.engine().state(), TimerState::Paused);
    assert_eq!(
        session.store().get(TASKS_KEY).unwrap().as_deref(),
        Some("Write 5\nWalk 2")
    );

    session.play();
    assert_eq!(session.engine().tasks().len(), 2);
    assert_eq!(session.engine().remaining_secs(), 270);
    assert_eq!(session.engine().scheduler().live().len(), 1);
}

#[test]
fn test_hard_mode_abandons_queue() {
    let mut db = Database::open_memory().unwrap();
    db.set(TASKS_KEY, "Sprint 1\nCool down 1").unwrap();
    let clock = ManualClock::new(0);
    let engine = TimerEngine::new(ManualScheduler::new(), MemoryNotifier::new(), clock.clone())
        .with_hard_mode(true);
    let mut session = Session::open(db, engine).unwrap();
    session.play();

    let events = run_for(&mut session, &clock, 61);
    assert!(matches!(events.last(), Some(Event::TaskAbandoned { task_index: 0, .. })));
    assert_eq!(session.engine().state(), TimerState::Idle);
    assert!(!session.engine().completed_all_tasks());
    assert_eq!(session.engine().input(), "Sprint 1\nCool down 1");
}
