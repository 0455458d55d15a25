//! The single live countdown and the scheduler that drives its ticks.
//!
//! The engine owns at most one [`Countdown`]. Restarting it always cancels
//! the previous id through the [`Scheduler`] before scheduling a new one;
//! ticks that arrive with a stale id are ignored by the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies one scheduled countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownId(pub u64);

/// A running countdown: its id and the instant (epoch ms) elapsed time is
/// measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub id: CountdownId,
    pub anchor_ms: i64,
}

/// Schedules and cancels the repeating tick.
///
/// Implementations deliver ticks back to the owner of the engine, which
/// calls `TimerEngine::tick` with the id.
pub trait Scheduler {
    fn schedule(&mut self, id: CountdownId, period: Duration);
    fn cancel(&mut self, id: CountdownId);
}

/// Records schedule/cancel calls. Ticks are delivered by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Vec<CountdownId>,
    scheduled_total: usize,
    period: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Countdowns scheduled and not yet cancelled.
    pub fn live(&self) -> &[CountdownId] {
        &self.live
    }

    pub fn scheduled_total(&self) -> usize {
        self.scheduled_total
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, id: CountdownId, period: Duration) {
        self.live.push(id);
        self.scheduled_total += 1;
        self.period = Some(period);
    }

    fn cancel(&mut self, id: CountdownId) {
        self.live.retain(|live| *live != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_removes_only_matching_id() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(CountdownId(1), Duration::from_secs(1));
        scheduler.schedule(CountdownId(2), Duration::from_secs(1));
        scheduler.cancel(CountdownId(1));
        assert_eq!(scheduler.live(), &[CountdownId(2)]);
        assert_eq!(scheduler.scheduled_total(), 2);
    }
}
