//! Task records produced by the task parser.
//!
//! A task is one timed unit of work derived from one input line, or one
//! repetition of a repeated line. Tasks are immutable once parsed; the
//! engine replaces the whole queue on every re-parse.

mod parser;

pub use parser::{
    coerce_number, is_integer, normalize_input, parse_tasks, strip_list_marker,
    DEFAULT_TASK_SECS, MAX_REPETITIONS,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Display label. May contain spaces.
    pub name: String,
    /// Duration in seconds.
    pub time_secs: i64,
    /// How many instances the source line expanded into.
    pub repetition_count: u32,
    /// 1-based occurrence number, only set when `repetition_count > 1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl Task {
    pub fn new(name: impl Into<String>, time_secs: i64) -> Self {
        Self {
            name: name.into(),
            time_secs,
            repetition_count: 1,
            index: None,
        }
    }

    /// Name with the occurrence suffix, e.g. `Work (2)`.
    pub fn display_name(&self) -> String {
        match self.index {
            Some(index) => format!("{} ({index})", self.name),
            None => self.name.clone(),
        }
    }

    /// Duration in minutes as a human would write it: `10`, `1.5`.
    pub fn minutes_label(&self) -> String {
        format_minutes(self.time_secs)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}m]", self.display_name(), self.minutes_label())
    }
}

/// Render a duration in seconds as minutes, dropping a trailing `.0`.
pub fn format_minutes(secs: i64) -> String {
    if secs % 60 == 0 {
        (secs / 60).to_string()
    } else {
        (secs as f64 / 60.0).to_string()
    }
}
