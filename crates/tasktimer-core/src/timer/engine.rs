//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine over a parsed task
//! queue. It does not use internal threads - the driver delivers ticks for
//! the live countdown by calling `tick()` with its id.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            +-> Completed (queue exhausted) -> Running (play again)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(scheduler, notifier, SystemClock);
//! engine.set_input("Write 25\nBreak 5");
//! engine.play();
//! // Whenever the scheduler fires:
//! engine.tick(id); // Returns Some(Event) when a task ends
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::clock::Clock;
use super::countdown::{Countdown, CountdownId, Scheduler};
use super::display::{format_clock, Controls};
use super::notify::Notifier;
use crate::events::Event;
use crate::task::{format_minutes, normalize_input, parse_tasks, Task};

pub const ALL_TASKS_COMPLETED: &str = "All tasks completed!";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Every task in the queue has been finished.
    Completed,
}

/// Where the countdown measures elapsed time from when it (re)starts.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// Full task time, anchored at now.
    Fresh,
    /// Keep `remaining_secs`; anchor so the elapsed part is preserved.
    Resume,
}

/// Core timer engine.
///
/// Owns the raw task text, the committed queue and the single countdown.
pub struct TimerEngine<S, N, C> {
    input: String,
    tasks: Vec<Task>,
    index: usize,
    remaining_secs: i64,
    state: TimerState,
    hard_mode: bool,
    tick_interval: Duration,
    countdown: Option<Countdown>,
    next_countdown_id: u64,
    scheduler: S,
    notifier: N,
    clock: C,
}

impl<S: Scheduler, N: Notifier, C: Clock> TimerEngine<S, N, C> {
    /// Create an idle engine with no input.
    pub fn new(scheduler: S, notifier: N, clock: C) -> Self {
        Self {
            input: String::new(),
            tasks: Vec::new(),
            index: 0,
            remaining_secs: 0,
            state: TimerState::Idle,
            hard_mode: false,
            tick_interval: DEFAULT_TICK_INTERVAL,
            countdown: None,
            next_countdown_id: 1,
            scheduler,
            notifier,
            clock,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_hard_mode(mut self, hard_mode: bool) -> Self {
        self.hard_mode = hard_mode;
        self
    }

    /// Seed the raw text without running the edit guard (hydration).
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_index(&self) -> usize {
        self.index
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }

    pub fn hard_mode(&self) -> bool {
        self.hard_mode
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.index)
    }

    /// A queue has been committed by play and not cleared or finished.
    pub fn in_progress(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Paused)
    }

    pub fn is_playing(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn completed_all_tasks(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn countdown_id(&self) -> Option<CountdownId> {
        self.countdown.map(|c| c.id)
    }

    pub fn clock_label(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// Name of the task being timed, with its occurrence suffix.
    pub fn current_task_label(&self) -> Option<String> {
        self.current_task().map(Task::display_name)
    }

    pub fn controls(&self) -> Controls {
        Controls::for_mode(self.hard_mode)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            task_index: self.index,
            task_label: self.current_task_label(),
            remaining_secs: self.remaining_secs,
            clock: self.clock_label(),
            task_count: self.tasks.len(),
            completed_all_tasks: self.completed_all_tasks(),
            hard_mode: self.hard_mode,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Parse the input and start (or resume) the countdown.
    ///
    /// No-op when the input holds no tasks.
    pub fn play(&mut self) -> Option<Event> {
        if self.state == TimerState::Completed {
            self.clear(false);
        }

        let parsed = parse_tasks(&self.input);
        if parsed.is_empty() {
            debug!("play ignored: no tasks in input");
            return None;
        }

        if self.index >= parsed.len() {
            self.index = 0;
            self.remaining_secs = 0;
        }
        let committed_time = self.tasks.get(self.index).map(|t| t.time_secs);
        let parsed_time = parsed[self.index].time_secs;
        if committed_time != Some(parsed_time) || self.remaining_secs <= 0 {
            self.remaining_secs = parsed_time;
        }

        self.input = normalize_input(&self.input);
        self.tasks = parsed;
        self.state = TimerState::Running;
        self.start_countdown(Anchor::Resume);

        debug!(
            task_index = self.index,
            remaining_secs = self.remaining_secs,
            task_count = self.tasks.len(),
            "timer started"
        );
        Some(Event::TimerStarted {
            task_index: self.index,
            task_name: self.current_task_label().unwrap_or_default(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.cancel_countdown();
        self.state = TimerState::Paused;
        debug!(remaining_secs = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            task_index: self.index,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Bound to Shift+Enter in the presentation layer.
    pub fn toggle_play_pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => self.pause(),
            _ => self.play(),
        }
    }

    /// Finish the current task and start the next one.
    ///
    /// Past the last task the run ends: "All tasks completed!" is sent and
    /// the run state is cleared, keeping the index at the end of the queue.
    pub fn skip_next(&mut self) -> Option<Event> {
        if !self.in_progress() {
            return None;
        }

        let from = self.index;
        self.index += 1;
        let message = match (self.tasks.get(from), self.tasks.get(self.index)) {
            (Some(prev), Some(next)) => Some(transition_message(prev, next)),
            _ => None,
        };

        match message {
            Some(message) => {
                self.state = TimerState::Running;
                self.start_countdown(Anchor::Fresh);
                self.notify(&message);
                debug!(from, to = self.index, "task advanced");
                Some(Event::TaskAdvanced {
                    from_index: from,
                    to_index: self.index,
                    message,
                    at: Utc::now(),
                })
            }
            None => {
                self.notify(ALL_TASKS_COMPLETED);
                self.finish();
                debug!(task_count = self.tasks.len(), "all tasks completed");
                Some(Event::AllTasksCompleted {
                    task_count: self.tasks.len(),
                    at: Utc::now(),
                })
            }
        }
    }

    /// Hard-mode "Done": marks the current task finished.
    pub fn done(&mut self) -> Option<Event> {
        self.skip_next()
    }

    /// Go back one task and start it at its full time.
    pub fn skip_previous(&mut self) -> Option<Event> {
        if self.index == 0 || self.index > self.tasks.len() {
            return None;
        }
        self.index -= 1;
        self.state = TimerState::Running;
        self.start_countdown(Anchor::Fresh);
        Some(Event::TaskRestarted {
            task_index: self.index,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Give back 10% of the current task's time.
    ///
    /// When idle, resumes into the last task of the committed queue with
    /// 10% of its time. When the extra time overflows the current task it
    /// spills into the previous one.
    pub fn restore_ten_percent(&mut self) -> Option<Event> {
        if self.in_progress() {
            let full = self.current_task()?.time_secs;
            let restored = self.remaining_secs.saturating_add(ten_percent(full));
            if restored <= full || self.index == 0 {
                self.remaining_secs = restored.min(full);
            } else {
                self.remaining_secs = restored - full;
                self.index -= 1;
            }
        } else {
            let last = self.tasks.last()?.time_secs;
            self.index = self.tasks.len() - 1;
            self.remaining_secs = ten_percent(last);
        }

        self.state = TimerState::Running;
        self.start_countdown(Anchor::Resume);
        Some(Event::TimeRestored {
            task_index: self.index,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Restart the current task from its full time.
    pub fn reset_current_task_time(&mut self) -> Option<Event> {
        if !self.in_progress() {
            return None;
        }
        self.state = TimerState::Running;
        self.start_countdown(Anchor::Fresh);
        Some(Event::TaskRestarted {
            task_index: self.index,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop the run and go back to the first task.
    ///
    /// The committed queue is kept so `restore_ten_percent` can resume it.
    pub fn clear(&mut self, clear_input: bool) -> Option<Event> {
        self.cancel_countdown();
        self.state = TimerState::Idle;
        self.remaining_secs = 0;
        self.index = 0;
        if clear_input {
            self.input.clear();
        }
        debug!(clear_input, "timer cleared");
        Some(Event::Cleared {
            input_cleared: clear_input,
            at: Utc::now(),
        })
    }

    /// Replace the raw task text.
    ///
    /// Typing pauses a running timer. Shrinking the text to a single
    /// character (select-all and type) clears the run entirely. Unchanged
    /// text is a no-op.
    pub fn set_input(&mut self, text: impl Into<String>) -> Option<Event> {
        let text = text.into();
        if text == self.input {
            return None;
        }
        let mut event = self.pause();
        if text.chars().count() == 1 && self.input.chars().count() > 1 {
            event = self.clear(false);
        }
        self.input = text;
        event
    }

    pub fn set_hard_mode(&mut self, hard_mode: bool) {
        self.hard_mode = hard_mode;
    }

    /// Recompute remaining time from the anchor.
    ///
    /// Returns `Some(Event)` when the current task ran out. Ticks for a
    /// countdown that is no longer live are ignored.
    pub fn tick(&mut self, id: CountdownId) -> Option<Event> {
        let countdown = self.countdown.filter(|c| c.id == id)?;
        if self.state != TimerState::Running {
            return None;
        }
        let full = self.current_task()?.time_secs;
        let elapsed_secs = self
            .clock
            .now_ms()
            .saturating_sub(countdown.anchor_ms)
            .div_euclid(1000);
        self.remaining_secs = full.saturating_sub(elapsed_secs);
        if self.remaining_secs > 0 {
            return None;
        }
        if self.hard_mode {
            self.abandon()
        } else {
            self.skip_next()
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_countdown(&mut self, anchor: Anchor) {
        self.cancel_countdown();
        let full = self.current_task().map(|t| t.time_secs).unwrap_or(0);
        let now = self.clock.now_ms();
        let anchor_ms = match anchor {
            Anchor::Fresh => {
                self.remaining_secs = full;
                now
            }
            Anchor::Resume => {
                let elapsed_secs = full.saturating_sub(self.remaining_secs);
                now.saturating_sub(elapsed_secs.saturating_mul(1000))
            }
        };
        let id = CountdownId(self.next_countdown_id);
        self.next_countdown_id += 1;
        self.scheduler.schedule(id, self.tick_interval);
        self.countdown = Some(Countdown { id, anchor_ms });
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            self.scheduler.cancel(countdown.id);
        }
    }

    /// End of queue: stop without resetting the index.
    fn finish(&mut self) {
        self.cancel_countdown();
        self.state = TimerState::Completed;
        self.remaining_secs = 0;
    }

    fn abandon(&mut self) -> Option<Event> {
        let task_index = self.index;
        let name = self.current_task_label().unwrap_or_default();
        let message = format!("\"{name}\" was not finished in time");
        self.notify(&message);
        self.clear(false);
        Some(Event::TaskAbandoned {
            task_index,
            message,
            at: Utc::now(),
        })
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = self.notifier.notify(message) {
            warn!(error = %err, "notification dropped");
        }
    }
}

fn ten_percent(secs: i64) -> i64 {
    (secs as f64 * 0.1).ceil() as i64
}

fn transition_message(prev: &Task, next: &Task) -> String {
    let plural = if next.time_secs == 60 { "" } else { "s" };
    format!(
        "\"{}\" completed, \"{}\" started for {} minute{plural}",
        prev.display_name(),
        next.display_name(),
        format_minutes(next.time_secs),
    )
}
