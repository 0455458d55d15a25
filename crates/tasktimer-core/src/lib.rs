//! # Task Timer Core Library
//!
//! This library provides the core logic for Task Timer: a sequential
//! countdown through a list of tasks typed as free text. All operations are
//! available through the standalone CLI binary, which is a thin driver over
//! this crate.
//!
//! ## Architecture
//!
//! - **Task Parser**: Pure function turning lines like `Work 5r3` into a
//!   task queue
//! - **Timer Engine**: A wall-clock-based state machine that derives
//!   remaining time from an anchor timestamp on every tick
//! - **Session**: Keeps the raw task text in a key-value store
//! - **Storage**: SQLite key-value store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`parse_tasks`]: Task parser
//! - [`TimerEngine`]: Core timer state machine
//! - [`Session`]: Engine bound to persistence
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, NotifyError};
pub use events::Event;
pub use session::Session;
pub use storage::{Config, Database, MemoryStore, Store};
pub use task::{parse_tasks, Task};
pub use timer::{
    format_clock, Clock, Controls, CountdownId, LogNotifier, ManualClock, ManualScheduler,
    MemoryNotifier, Notifier, Scheduler, SystemClock, TimerEngine, TimerState,
};
