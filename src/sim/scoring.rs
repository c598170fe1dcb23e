//! Hit points, miss penalties and combo bookkeeping
//!
//! Pure functions over `GameState`; no timers or presentation here.

use std::fmt;

use super::difficulty::DifficultyProfile;
use super::state::GameState;

/// What caused a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// Tap landed on empty playfield
    Area,
    /// Target lifetime ran out
    Timeout,
}

/// Floating text shown where the player tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Hit { points: u32, combo: u32 },
    Miss { penalty: u32 },
    TimeUp { penalty: u32 },
}

impl Feedback {
    /// Combo hits get the highlighted style
    pub fn is_combo(&self) -> bool {
        matches!(self, Feedback::Hit { combo, .. } if *combo > 1)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Hit { points, combo } if *combo > 1 => {
                write!(f, "COMBO x{} (+{})", combo, points)
            }
            Feedback::Hit { points, .. } => write!(f, "+{}", points),
            Feedback::Miss { penalty } => write!(f, "MISS (-{})", penalty),
            Feedback::TimeUp { penalty } => write!(f, "TIME UP! (-{})", penalty),
        }
    }
}

/// Points for hitting a target of `base_score` with `combo` hits already chained.
///
/// Each term is rounded half away from zero before summing.
pub fn compute_hit_points(base_score: u32, profile: &DifficultyProfile, combo: u32) -> u32 {
    let base = (base_score as f64 * profile.score_multiplier).round();
    let bonus = if combo > 0 {
        (combo as f64 * profile.combo_bonus_multiplier).round()
    } else {
        0.0
    };
    base as u32 + bonus as u32
}

/// Credit a hit: add points and extend the combo
pub fn apply_hit(state: &mut GameState, points: u32) -> Feedback {
    state.score = state.score.saturating_add(points);
    state.combo += 1;
    Feedback::Hit {
        points,
        combo: state.combo,
    }
}

/// Charge a miss: subtract the penalty (floored at zero) and break the combo
pub fn apply_miss(state: &mut GameState, penalty: u32, kind: MissKind) -> Feedback {
    state.score = state.score.saturating_sub(penalty);
    state.combo = 0;
    state.miss_count += 1;
    match kind {
        MissKind::Area => Feedback::Miss { penalty },
        MissKind::Timeout => Feedback::TimeUp { penalty },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{Difficulty, TargetSize};
    use proptest::prelude::*;

    #[test]
    fn test_normal_medium_first_hit() {
        let mut state = GameState::new(Difficulty::Normal, 30_000);
        let points = compute_hit_points(TargetSize::Medium.base_score(), state.profile(), state.combo);
        assert_eq!(points, 2);

        apply_hit(&mut state, points);
        assert_eq!(state.score, 2);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_normal_small_with_combo() {
        let points = compute_hit_points(TargetSize::Small.base_score(), Difficulty::Normal.profile(), 3);
        assert_eq!(points, 6);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // easy: large = 1 * 0.5 -> 1, combo 1 * 0.5 -> 1
        let easy = Difficulty::Easy.profile();
        assert_eq!(compute_hit_points(1, easy, 0), 1);
        assert_eq!(compute_hit_points(1, easy, 1), 2);
        // hard: small = 3 * 1.5 = 4.5 -> 5, combo 3 * 1.5 = 4.5 -> 5
        let hard = Difficulty::Hard.profile();
        assert_eq!(compute_hit_points(3, hard, 0), 5);
        assert_eq!(compute_hit_points(3, hard, 3), 10);
    }

    #[test]
    fn test_miss_clamps_and_resets_combo() {
        let mut state = GameState::new(Difficulty::Hard, 30_000);
        state.score = 7;
        state.combo = 4;

        let feedback = apply_miss(&mut state, 15, MissKind::Timeout);

        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.miss_count, 1);
        assert_eq!(feedback, Feedback::TimeUp { penalty: 15 });
    }

    #[test]
    fn test_feedback_text() {
        assert_eq!(Feedback::Hit { points: 2, combo: 1 }.to_string(), "+2");
        assert_eq!(Feedback::Hit { points: 6, combo: 4 }.to_string(), "COMBO x4 (+6)");
        assert_eq!(Feedback::Miss { penalty: 10 }.to_string(), "MISS (-10)");
        assert_eq!(Feedback::TimeUp { penalty: 15 }.to_string(), "TIME UP! (-15)");
        assert!(Feedback::Hit { points: 6, combo: 2 }.is_combo());
        assert!(!Feedback::Hit { points: 2, combo: 1 }.is_combo());
    }

    proptest! {
        #[test]
        fn prop_points_non_decreasing_in_combo(base in 1u32..=3, combo in 0u32..1000, d in 0usize..3) {
            let profile = Difficulty::ALL[d].profile();
            let now = compute_hit_points(base, profile, combo);
            let next = compute_hit_points(base, profile, combo + 1);
            prop_assert!(next >= now);
            prop_assert_eq!(now, compute_hit_points(base, profile, combo));
        }

        #[test]
        fn prop_score_never_negative(
            events in proptest::collection::vec((any::<bool>(), 0u32..100), 0..200)
        ) {
            let mut state = GameState::default();
            for (hit, amount) in events {
                let before = state.score;
                if hit {
                    apply_hit(&mut state, amount);
                    prop_assert_eq!(state.score, before + amount);
                } else {
                    apply_miss(&mut state, amount, MissKind::Area);
                    prop_assert_eq!(state.score, before.saturating_sub(amount));
                    prop_assert_eq!(state.combo, 0);
                }
            }
        }
    }
}
