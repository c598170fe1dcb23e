//! Round state machine
//!
//! `GameController` sequences Idle -> Running -> Ended, routes player input to
//! scoring and the target lifecycle, and reports every visible change to a
//! `Presenter`. Time only moves through `advance`; every input method
//! advances to its own timestamp first, so a target whose expiry is already
//! due cannot be hit.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{ClockStatus, GameClock};
use super::difficulty::Difficulty;
use super::scoring::{Feedback, MissKind, apply_hit, apply_miss, compute_hit_points};
use super::state::{GamePhase, GameState};
use super::target::{Playfield, Target, TargetLifecycle};
use super::timer::{Scheduler, TimerEvent};
use crate::settings::Settings;

/// What an empty-area tap does to the live target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AreaMissPolicy {
    /// Discard the target and spawn a fresh one
    #[default]
    Respawn,
    /// Leave the target (and its timers) alone
    KeepTarget,
}

impl AreaMissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaMissPolicy::Respawn => "respawn",
            AreaMissPolicy::KeepTarget => "keep",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "respawn" => Some(AreaMissPolicy::Respawn),
            "keep" | "keep-target" => Some(AreaMissPolicy::KeepTarget),
            _ => None,
        }
    }
}

/// Rendering side of the game. All methods default to no-ops.
pub trait Presenter {
    fn on_target_activated(&mut self, _target: &Target) {}
    fn on_target_warning(&mut self, _target_id: u32) {}
    fn on_target_deactivated(&mut self) {}
    fn report_score(&mut self, _score: u32) {}
    fn report_miss(&mut self, _miss_count: u32) {}
    fn report_combo(&mut self, _combo: u32) {}
    fn report_remaining_time(&mut self, _remaining_ms: u64) {}
    fn report_phase(&mut self, _phase: GamePhase) {}
    fn report_game_ended(&mut self, _final_score: u32, _final_miss: u32) {}
    fn show_feedback(&mut self, _feedback: Feedback) {}

    /// Current play area, queried before every spawn. `None` keeps the last one.
    fn playfield(&self) -> Option<Playfield> {
        None
    }
}

/// Headless play
impl Presenter for () {}

/// Owns everything about a round
pub struct GameController<P: Presenter> {
    presenter: P,
    settings: Settings,
    phase: GamePhase,
    state: GameState,
    playfield: Playfield,
    clock: GameClock,
    targets: TargetLifecycle,
    scheduler: Scheduler,
    rng: Pcg32,
}

impl<P: Presenter> GameController<P> {
    pub fn new(presenter: P, settings: Settings, seed: u64) -> Self {
        let state = GameState::new(settings.difficulty, settings.duration_ms());
        let mut controller = Self {
            presenter,
            settings,
            phase: GamePhase::Idle,
            state,
            playfield: Playfield::default(),
            clock: GameClock::new(),
            targets: TargetLifecycle::new(),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        controller.report_all();
        controller
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.targets.current()
    }

    pub fn target_lifecycle(&self) -> &TargetLifecycle {
        &self.targets
    }

    /// Countdown value as last displayed
    pub fn remaining_ms(&self) -> u64 {
        match self.phase {
            GamePhase::Idle => self.state.duration_ms,
            _ => self.clock.remaining_ms(),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Idle {
            log::debug!("Ignoring difficulty change while {:?}", self.phase);
            return false;
        }
        self.settings.difficulty = difficulty;
        self.state.difficulty = difficulty;
        log::info!("Difficulty: {}", difficulty.as_str());
        true
    }

    pub fn select_duration(&mut self, secs: u32) -> bool {
        if self.phase != GamePhase::Idle || secs == 0 {
            log::debug!("Ignoring duration {}s while {:?}", secs, self.phase);
            return false;
        }
        self.settings.duration_secs = secs;
        self.state.duration_ms = self.settings.duration_ms();
        self.presenter.report_remaining_time(self.state.duration_ms);
        log::info!("Duration: {}s", secs);
        true
    }

    pub fn select_area_miss_policy(&mut self, policy: AreaMissPolicy) -> bool {
        if self.phase != GamePhase::Idle {
            log::debug!("Ignoring area-miss policy change while {:?}", self.phase);
            return false;
        }
        self.settings.area_miss = policy;
        log::info!("Area miss: {}", policy.as_str());
        true
    }

    /// Start a round. From `Ended` this is "play again": reset, then start.
    pub fn request_start(&mut self, now_ms: u64) -> bool {
        self.advance(now_ms);
        match self.phase {
            GamePhase::Running => return false,
            GamePhase::Ended => self.reset(),
            GamePhase::Idle => {}
        }

        self.state.reset();
        self.state.is_active = true;
        self.state.started_at_ms = Some(self.scheduler.now());
        self.clock.start(self.state.duration_ms, &mut self.scheduler);
        self.phase = GamePhase::Running;
        log::info!(
            "Round started: {} for {}ms",
            self.state.difficulty.as_str(),
            self.state.duration_ms
        );

        self.report_all();
        self.spawn_target();
        true
    }

    /// Back to the start overlay. Ignored mid-round.
    pub fn request_reset(&mut self, now_ms: u64) -> bool {
        self.advance(now_ms);
        if self.phase == GamePhase::Running {
            log::debug!("Ignoring reset while running");
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.clock.stop(&mut self.scheduler);
        self.clear_target();
        self.state.reset();
        self.phase = GamePhase::Idle;
        self.report_all();
    }

    /// Player tapped target `target_id`
    pub fn hit(&mut self, target_id: u32, now_ms: u64) -> bool {
        self.advance(now_ms);
        if self.phase != GamePhase::Running {
            return false;
        }
        let Some(target) = self.targets.resolve_hit(target_id, &mut self.scheduler) else {
            log::debug!("Stale hit on target {}", target_id);
            return false;
        };
        self.presenter.on_target_deactivated();

        let points = compute_hit_points(target.base_score(), self.state.profile(), self.state.combo);
        let feedback = apply_hit(&mut self.state, points);
        log::debug!(
            "Hit target {} after {}ms: +{} (combo {})",
            target.id,
            self.scheduler.now().saturating_sub(target.created_at_ms),
            points,
            self.state.combo
        );
        self.presenter.report_score(self.state.score);
        self.presenter.report_combo(self.state.combo);
        self.presenter.show_feedback(feedback);

        self.spawn_target();
        true
    }

    /// Player tapped empty playfield
    pub fn area_miss(&mut self, now_ms: u64) -> bool {
        self.advance(now_ms);
        if self.phase != GamePhase::Running {
            return false;
        }
        self.charge_miss(MissKind::Area);
        if self.settings.area_miss == AreaMissPolicy::Respawn {
            self.spawn_target();
        }
        true
    }

    /// Fire every timer due at or before `now_ms`
    pub fn advance(&mut self, now_ms: u64) {
        while let Some((_, event)) = self.scheduler.pop_due(now_ms) {
            self.on_timer(event);
        }
    }

    fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::ClockTick => {
                let now = self.scheduler.now();
                match self.clock.on_tick(now, &mut self.scheduler) {
                    ClockStatus::Running(remaining) => {
                        self.presenter.report_remaining_time(remaining);
                    }
                    ClockStatus::Expired => {
                        self.presenter.report_remaining_time(0);
                        self.end();
                    }
                    ClockStatus::Stopped => {}
                }
            }
            TimerEvent::TargetWarning { target_id } => {
                if self.targets.on_warning(target_id) {
                    self.presenter.on_target_warning(target_id);
                }
            }
            TimerEvent::TargetExpiry { target_id } => {
                if self.phase != GamePhase::Running {
                    return;
                }
                if self.targets.on_expiry(target_id, &mut self.scheduler).is_some() {
                    self.presenter.on_target_deactivated();
                    self.charge_miss(MissKind::Timeout);
                    self.spawn_target();
                }
            }
        }
    }

    fn charge_miss(&mut self, kind: MissKind) {
        let penalty = self.state.profile().miss_penalty;
        let feedback = apply_miss(&mut self.state, penalty, kind);
        log::debug!("{:?} miss: -{} (score {})", kind, penalty, self.state.score);
        self.presenter.report_score(self.state.score);
        self.presenter.report_miss(self.state.miss_count);
        self.presenter.report_combo(self.state.combo);
        self.presenter.show_feedback(feedback);
    }

    fn end(&mut self) {
        self.clock.stop(&mut self.scheduler);
        self.clear_target();
        self.state.is_active = false;
        self.phase = GamePhase::Ended;
        log::info!(
            "Round over: score {}, misses {}",
            self.state.score,
            self.state.miss_count
        );
        self.presenter.report_phase(self.phase);
        self.presenter
            .report_game_ended(self.state.score, self.state.miss_count);
    }

    fn spawn_target(&mut self) {
        self.clear_target();
        if let Some(playfield) = self.presenter.playfield() {
            self.playfield = playfield;
        }
        let profile = self.state.profile();
        let target = self
            .targets
            .spawn(profile, &self.playfield, &mut self.rng, &mut self.scheduler);
        self.presenter.on_target_activated(target);
    }

    fn clear_target(&mut self) {
        if self.targets.current().is_some() {
            self.targets.cancel(&mut self.scheduler);
            self.presenter.on_target_deactivated();
        }
    }

    fn report_all(&mut self) {
        self.presenter.report_phase(self.phase);
        self.presenter.report_score(self.state.score);
        self.presenter.report_miss(self.state.miss_count);
        self.presenter.report_combo(self.state.combo);
        self.presenter.report_remaining_time(self.remaining_ms());
    }
}
