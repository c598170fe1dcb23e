//! Difficulty levels and their tuning table

use serde::{Deserialize, Serialize};

use crate::consts::{TARGET_PX_COMPACT, TARGET_PX_DESKTOP};

/// Target size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSize {
    Small,
    Medium,
    Large,
}

impl TargetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetSize::Small => "small",
            TargetSize::Medium => "medium",
            TargetSize::Large => "large",
        }
    }

    /// Points for a hit before multipliers (smaller is worth more)
    pub fn base_score(&self) -> u32 {
        match self {
            TargetSize::Small => 3,
            TargetSize::Medium => 2,
            TargetSize::Large => 1,
        }
    }

    /// Edge length in pixels for the given layout
    pub fn pixels(&self, desktop: bool) -> f32 {
        let table = if desktop {
            TARGET_PX_DESKTOP
        } else {
            TARGET_PX_COMPACT
        };
        match self {
            TargetSize::Small => table[0],
            TargetSize::Medium => table[1],
            TargetSize::Large => table[2],
        }
    }
}

/// Tunables for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Size of every target spawned at this level
    pub target_size: TargetSize,
    /// How long a target stays clickable (ms)
    pub target_lifetime_ms: u64,
    /// Multiplier on the size-based score
    pub score_multiplier: f64,
    /// Bonus per combo step
    pub combo_bonus_multiplier: f64,
    /// Points lost on an area miss or timeout
    pub miss_penalty: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    target_size: TargetSize::Large,
    target_lifetime_ms: 4000,
    score_multiplier: 0.5,
    combo_bonus_multiplier: 0.5,
    miss_penalty: 5,
};

const NORMAL: DifficultyProfile = DifficultyProfile {
    target_size: TargetSize::Medium,
    target_lifetime_ms: 3000,
    score_multiplier: 1.0,
    combo_bonus_multiplier: 1.0,
    miss_penalty: 10,
};

const HARD: DifficultyProfile = DifficultyProfile {
    target_size: TargetSize::Small,
    target_lifetime_ms: 2000,
    score_multiplier: 1.5,
    combo_bonus_multiplier: 1.5,
    miss_penalty: 15,
};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}
