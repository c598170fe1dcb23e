//! Round countdown

use super::timer::{Scheduler, TimerEvent, TimerId};
use crate::consts::CLOCK_TICK_MS;

/// Result of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    /// Time left (ms)
    Running(u64),
    /// Countdown reached zero on this tick
    Expired,
    /// Clock not started, or already expired
    Stopped,
}

/// Counts a round down from its duration to zero
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    duration_ms: u64,
    started_at_ms: Option<u64>,
    remaining_ms: u64,
    tick: Option<TimerId>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting down from `duration_ms`, starting at the scheduler's current time
    pub fn start(&mut self, duration_ms: u64, scheduler: &mut Scheduler) {
        self.stop(scheduler);
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.started_at_ms = Some(scheduler.now());
        self.tick = Some(scheduler.every(CLOCK_TICK_MS, TimerEvent::ClockTick));
    }

    /// Recompute remaining time at `now_ms`
    pub fn on_tick(&mut self, now_ms: u64, scheduler: &mut Scheduler) -> ClockStatus {
        let (Some(started), Some(_)) = (self.started_at_ms, self.tick) else {
            return ClockStatus::Stopped;
        };

        let elapsed = now_ms.saturating_sub(started);
        let remaining = self.duration_ms.saturating_sub(elapsed);
        if remaining == 0 {
            self.remaining_ms = 0;
            self.stop(scheduler);
            return ClockStatus::Expired;
        }

        self.remaining_ms = self.remaining_ms.min(remaining);
        ClockStatus::Running(self.remaining_ms)
    }

    /// Cancel the periodic tick. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.tick.take() {
            scheduler.cancel(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }
}
