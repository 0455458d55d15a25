//! Runtime collaborators for the interactive run loop.
//!
//! [`IntervalScheduler`] turns the engine's schedule/cancel calls into a
//! tokio interval; the run loop awaits [`IntervalScheduler::next_tick`] and
//! hands the id back to the engine.

use std::time::Duration;

use tasktimer_core::error::NotifyError;
use tasktimer_core::storage::NotificationsConfig;
use tasktimer_core::{CountdownId, LogNotifier, Notifier, Scheduler};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Holds the one live countdown interval.
#[derive(Default)]
pub struct IntervalScheduler {
    active: Option<(CountdownId, Interval)>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves with the id of the live countdown on its next tick.
    /// Never resolves while nothing is scheduled.
    pub async fn next_tick(&mut self) -> CountdownId {
        match &mut self.active {
            Some((id, interval)) => {
                interval.tick().await;
                *id
            }
            None => std::future::pending().await,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, id: CountdownId, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(id = id.0, period_ms = period.as_millis() as u64, "countdown scheduled");
        self.active = Some((id, interval));
    }

    fn cancel(&mut self, id: CountdownId) {
        if matches!(&self.active, Some((live, _)) if *live == id) {
            debug!(id = id.0, "countdown cancelled");
            self.active = None;
        }
    }
}

/// Logs every notification and raises a desktop one when enabled.
///
/// The run loop already prints every event to the terminal.
pub struct DesktopNotifier {
    log: LogNotifier,
    desktop: bool,
}

impl DesktopNotifier {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            log: LogNotifier,
            desktop: config.enabled && config.desktop,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, message: &str) -> Result<(), NotifyError> {
        self.log.notify(message)?;
        if !self.desktop {
            return Ok(());
        }
        notify_rust::Notification::new()
            .summary("Task Timer")
            .body(message)
            .appname("tasktimer")
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}
