use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every state change in the engine produces an Event.
/// Drivers print them; `None` from an operation means nothing changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        task_index: usize,
        task_name: String,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        task_index: usize,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    /// Moved on to the next task, by hand or because time ran out.
    TaskAdvanced {
        from_index: usize,
        to_index: usize,
        message: String,
        at: DateTime<Utc>,
    },
    /// The current task starts over at its full time.
    TaskRestarted {
        task_index: usize,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    TimeRestored {
        task_index: usize,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    AllTasksCompleted {
        task_count: usize,
        at: DateTime<Utc>,
    },
    /// Hard mode: time ran out before the task was marked done.
    TaskAbandoned {
        task_index: usize,
        message: String,
        at: DateTime<Utc>,
    },
    Cleared {
        input_cleared: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        task_index: usize,
        task_label: Option<String>,
        remaining_secs: i64,
        clock: String,
        task_count: usize,
        completed_all_tasks: bool,
        hard_mode: bool,
        at: DateTime<Utc>,
    },
}
