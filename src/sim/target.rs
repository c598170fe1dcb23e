//! The single live target and its lifetime timers

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyProfile, TargetSize};
use super::timer::{Scheduler, TimerEvent, TimerId};
use crate::consts::{DESKTOP_BREAKPOINT, PLAYFIELD_MARGIN};

/// Target color variants (presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
}

impl TargetColor {
    pub const ALL: [TargetColor; 6] = [
        TargetColor::Red,
        TargetColor::Blue,
        TargetColor::Green,
        TargetColor::Yellow,
        TargetColor::Purple,
        TargetColor::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetColor::Red => "red",
            TargetColor::Blue => "blue",
            TargetColor::Green => "green",
            TargetColor::Yellow => "yellow",
            TargetColor::Purple => "purple",
            TargetColor::Pink => "pink",
        }
    }
}

/// Play area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub size: Vec2,
    /// Desktop layouts use smaller targets
    pub desktop: bool,
}

impl Playfield {
    pub fn new(width: f32, height: f32, desktop: bool) -> Self {
        Self {
            size: Vec2::new(width, height),
            desktop,
        }
    }

    /// Build from the container rect and the window width
    pub fn from_viewport(width: f32, height: f32, viewport_width: f32) -> Self {
        Self::new(width, height, viewport_width > DESKTOP_BREAKPOINT)
    }

    /// Random top-left corner keeping a `size_px` box inside the margins
    pub fn random_position<R: Rng>(&self, size_px: f32, rng: &mut R) -> Vec2 {
        let span = (self.size - Vec2::splat(size_px + PLAYFIELD_MARGIN * 2.0)).max(Vec2::ZERO);
        let roll = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        roll * span + Vec2::splat(PLAYFIELD_MARGIN)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0, true)
    }
}

/// A clickable target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub size: TargetSize,
    pub color: TargetColor,
    /// Top-left corner in playfield pixels
    pub pos: Vec2,
    /// Edge length in pixels
    pub size_px: f32,
    /// Scheduler time at spawn
    pub created_at_ms: u64,
}

impl Target {
    pub fn base_score(&self) -> u32 {
        self.size.base_score()
    }
}

/// Lifecycle phase of the live target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPhase {
    /// No target on screen
    None,
    /// Fresh target
    Active,
    /// Past half its lifetime
    Warning,
    /// Lifetime ran out (transient, immediately followed by `None`)
    Expired,
}

/// Owns the live target and its warning/expiry timers
#[derive(Debug, Clone)]
pub struct TargetLifecycle {
    phase: TargetPhase,
    target: Option<Target>,
    warning: Option<TimerId>,
    expiry: Option<TimerId>,
    next_id: u32,
}

impl Default for TargetLifecycle {
    fn default() -> Self {
        Self {
            phase: TargetPhase::None,
            target: None,
            warning: None,
            expiry: None,
            next_id: 1,
        }
    }
}

impl TargetLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TargetPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Place a new target, replacing any live one
    pub fn spawn<R: Rng>(
        &mut self,
        profile: &DifficultyProfile,
        playfield: &Playfield,
        rng: &mut R,
        scheduler: &mut Scheduler,
    ) -> &Target {
        self.cancel(scheduler);

        let id = self.next_id;
        self.next_id += 1;

        let size = profile.target_size;
        let size_px = size.pixels(playfield.desktop);
        let color = TargetColor::ALL[rng.random_range(0..TargetColor::ALL.len())];
        let pos = playfield.random_position(size_px, rng);

        let lifetime = profile.target_lifetime_ms;
        self.warning = Some(scheduler.after(lifetime / 2, TimerEvent::TargetWarning { target_id: id }));
        self.expiry = Some(scheduler.after(lifetime, TimerEvent::TargetExpiry { target_id: id }));
        self.phase = TargetPhase::Active;

        self.target.insert(Target {
            id,
            size,
            color,
            pos,
            size_px,
            created_at_ms: scheduler.now(),
        })
    }

    fn is_live(&self, target_id: u32) -> bool {
        self.target.as_ref().is_some_and(|t| t.id == target_id)
    }

    /// Warning timer fired. Returns true if the live target changed phase.
    pub fn on_warning(&mut self, target_id: u32) -> bool {
        self.warning = None;
        if self.phase == TargetPhase::Active && self.is_live(target_id) {
            self.phase = TargetPhase::Warning;
            true
        } else {
            false
        }
    }

    /// Expiry timer fired. Returns the timed-out target.
    pub fn on_expiry(&mut self, target_id: u32, scheduler: &mut Scheduler) -> Option<Target> {
        if !self.is_live(target_id) {
            return None;
        }
        self.expiry = None;
        self.phase = TargetPhase::Expired;
        let expired = self.target.take();
        self.cancel(scheduler);
        expired
    }

    /// Player hit `target_id`. Returns the target if it was the live one.
    pub fn resolve_hit(&mut self, target_id: u32, scheduler: &mut Scheduler) -> Option<Target> {
        if !self.is_live(target_id) {
            return None;
        }
        let hit = self.target.take();
        self.cancel(scheduler);
        hit
    }

    /// Remove the live target without scoring it
    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.warning.take() {
            scheduler.cancel(id);
        }
        if let Some(id) = self.expiry.take() {
            scheduler.cancel(id);
        }
        self.target = None;
        self.phase = TargetPhase::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (TargetLifecycle, Scheduler, Pcg32) {
        (TargetLifecycle::new(), Scheduler::new(), Pcg32::seed_from_u64(7))
    }

    #[test]
    fn test_spawn_uses_profile_size_and_schedules_timers() {
        let (mut lifecycle, mut scheduler, mut rng) = setup();
        let profile = Difficulty::Hard.profile();

        let target = lifecycle.spawn(profile, &Playfield::default(), &mut rng, &mut scheduler).clone();

        assert_eq!(target.size, TargetSize::Small);
        assert_eq!(target.size_px, 40.0);
        assert_eq!(lifecycle.phase(), TargetPhase::Active);
        assert_eq!(scheduler.len(), 2);

        assert_eq!(
            scheduler.pop_due(10_000).map(|(_, e)| (scheduler.now(), e)),
            Some((1_000, TimerEvent::TargetWarning { target_id: target.id }))
        );
        assert_eq!(
            scheduler.pop_due(10_000).map(|(_, e)| (scheduler.now(), e)),
            Some((2_000, TimerEvent::TargetExpiry { target_id: target.id }))
        );
    }

    #[test]
    fn test_warning_then_expiry() {
        let (mut lifecycle, mut scheduler, mut rng) = setup();
        let id = lifecycle
            .spawn(Difficulty::Normal.profile(), &Playfield::default(), &mut rng, &mut scheduler)
            .id;

        assert!(lifecycle.on_warning(id));
        assert_eq!(lifecycle.phase(), TargetPhase::Warning);

        let expired = lifecycle.on_expiry(id, &mut scheduler);
        assert_eq!(expired.map(|t| t.id), Some(id));
        assert_eq!(lifecycle.phase(), TargetPhase::None);
        assert!(lifecycle.current().is_none());
    }

    #[test]
    fn test_hit_cancels_both_timers() {
        let (mut lifecycle, mut scheduler, mut rng) = setup();
        let id = lifecycle
            .spawn(Difficulty::Easy.profile(), &Playfield::default(), &mut rng, &mut scheduler)
            .id;

        assert!(lifecycle.resolve_hit(id, &mut scheduler).is_some());
        assert!(scheduler.is_empty());
        assert_eq!(lifecycle.phase(), TargetPhase::None);

        // Second hit on the same target is stale
        assert!(lifecycle.resolve_hit(id, &mut scheduler).is_none());
        assert!(lifecycle.on_expiry(id, &mut scheduler).is_none());
    }

    #[test]
    fn test_respawn_replaces_live_target() {
        let (mut lifecycle, mut scheduler, mut rng) = setup();
        let profile = Difficulty::Normal.profile();
        let first = lifecycle.spawn(profile, &Playfield::default(), &mut rng, &mut scheduler).id;
        let second = lifecycle.spawn(profile, &Playfield::default(), &mut rng, &mut scheduler).id;

        assert_ne!(first, second);
        assert_eq!(scheduler.len(), 2);
        assert!(!lifecycle.on_warning(first));
        assert!(lifecycle.on_expiry(first, &mut scheduler).is_none());
        assert_eq!(lifecycle.current().map(|t| t.id), Some(second));
    }

    #[test]
    fn test_cancel_clears_everything() {
        let (mut lifecycle, mut scheduler, mut rng) = setup();
        lifecycle.spawn(Difficulty::Normal.profile(), &Playfield::default(), &mut rng, &mut scheduler);

        lifecycle.cancel(&mut scheduler);
        lifecycle.cancel(&mut scheduler);

        assert!(scheduler.is_empty());
        assert!(lifecycle.current().is_none());
        assert_eq!(lifecycle.phase(), TargetPhase::None);
    }

    #[test]
    fn test_tiny_playfield_pins_to_margin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let playfield = Playfield::new(50.0, 50.0, true);
        assert_eq!(playfield.random_position(80.0, &mut rng), Vec2::splat(PLAYFIELD_MARGIN));
    }

    proptest! {
        #[test]
        fn prop_target_inside_margins(
            seed in any::<u64>(),
            w in 200.0f32..2000.0,
            h in 200.0f32..2000.0,
            viewport in 300.0f32..2000.0,
            d in 0usize..3,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut scheduler = Scheduler::new();
            let mut lifecycle = TargetLifecycle::new();
            let playfield = Playfield::from_viewport(w, h, viewport);

            let t = lifecycle.spawn(Difficulty::ALL[d].profile(), &playfield, &mut rng, &mut scheduler);

            prop_assert!(t.pos.x >= PLAYFIELD_MARGIN);
            prop_assert!(t.pos.y >= PLAYFIELD_MARGIN);
            prop_assert!(t.pos.x + t.size_px <= w - PLAYFIELD_MARGIN + 0.01);
            prop_assert!(t.pos.y + t.size_px <= h - PLAYFIELD_MARGIN + 0.01);
        }
    }
}
