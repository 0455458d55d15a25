//! Values the presentation layer renders from engine state.

use serde::{Deserialize, Serialize};

/// `MM:SS` for a remaining duration; `00:00` once time is up.
pub fn format_clock(remaining_secs: i64) -> String {
    if remaining_secs <= 0 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Transport affordances offered to the user.
///
/// Hard mode hides the escape hatches and swaps skip-next for a manual
/// "done" action. The engine still accepts every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub play_pause: bool,
    pub reset_current: bool,
    pub skip_previous: bool,
    pub skip_next: bool,
    pub done: bool,
    pub restore: bool,
    pub clear: bool,
}

impl Controls {
    pub fn for_mode(hard_mode: bool) -> Self {
        Self {
            play_pause: true,
            reset_current: true,
            skip_previous: !hard_mode,
            skip_next: !hard_mode,
            done: hard_mode,
            restore: !hard_mode,
            clear: !hard_mode,
        }
    }
}
