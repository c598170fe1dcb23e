//! Game state and round phases

use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyProfile};
use crate::consts::DEFAULT_DURATION_SECS;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start overlay, settings can change
    Idle,
    /// Countdown running, targets spawning
    Running,
    /// Time is up, final score on screen
    Ended,
}

/// Score and round bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Score (never below zero)
    pub score: u32,
    /// Area misses plus timeouts
    pub miss_count: u32,
    /// Consecutive hits since the last miss
    pub combo: u32,
    /// Difficulty the round is played at
    pub difficulty: Difficulty,
    /// Round length (ms)
    pub duration_ms: u64,
    /// True while the countdown is running
    pub is_active: bool,
    /// Scheduler time at which the round started
    pub started_at_ms: Option<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Difficulty::default(), DEFAULT_DURATION_SECS as u64 * 1000)
    }
}

impl GameState {
    pub fn new(difficulty: Difficulty, duration_ms: u64) -> Self {
        Self {
            score: 0,
            miss_count: 0,
            combo: 0,
            difficulty,
            duration_ms,
            is_active: false,
            started_at_ms: None,
        }
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.difficulty.profile()
    }

    /// Clear per-round counters, keeping the selected difficulty and duration
    pub fn reset(&mut self) {
        *self = Self::new(self.difficulty, self.duration_ms);
    }
}
