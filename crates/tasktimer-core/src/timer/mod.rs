mod clock;
mod countdown;
mod display;
mod engine;
mod notify;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{Countdown, CountdownId, ManualScheduler, Scheduler};
pub use display::{format_clock, Controls};
pub use engine::{TimerEngine, TimerState, ALL_TASKS_COMPLETED, DEFAULT_TICK_INTERVAL};
pub use notify::{LogNotifier, MemoryNotifier, Notifier};
