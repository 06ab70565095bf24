use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Shortest period a timer accepts. A zero period would tick in a busy loop.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Periodic tick owned by the playback controller. At most one schedule is
/// alive; `start` replaces it and `clear` (or drop) ends it.
#[derive(Debug)]
pub struct LoopGuard {
    period: Duration,
    next_tick: Option<Instant>,
}

impl LoopGuard {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_tick: None,
        }
    }

    pub fn start(&mut self) {
        self.clear();
        self.next_tick = Some(Instant::now() + self.period);
    }

    pub fn clear(&mut self) {
        self.next_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Resolves on the next tick. Never resolves while cleared. Dropping the
    /// future before it resolves leaves the schedule untouched.
    pub async fn tick(&mut self) {
        let Some(deadline) = self.next_tick else {
            return std::future::pending().await;
        };
        sleep_until(deadline).await;
        self.next_tick = Some(Instant::now() + self.period);
    }
}

#[cfg(test)]
#[path = "tests/loop_guard_tests.rs"]
mod tests;
