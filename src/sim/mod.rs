//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual time only (the caller supplies milliseconds)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod controller;
pub mod difficulty;
pub mod scoring;
pub mod state;
pub mod target;
pub mod timer;

pub use clock::{ClockStatus, GameClock};
pub use controller::{AreaMissPolicy, GameController, Presenter};
pub use difficulty::{Difficulty, DifficultyProfile, TargetSize};
pub use scoring::{Feedback, MissKind, apply_hit, apply_miss, compute_hit_points};
pub use state::{GamePhase, GameState};
pub use target::{Playfield, Target, TargetColor, TargetLifecycle, TargetPhase};
pub use timer::{Scheduler, TimerEvent, TimerId};
