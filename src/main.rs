//! Target Rush entry point
//!
//! Handles platform-specific initialization and drives the game clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, TouchEvent};

    use target_rush::consts::CLOCK_TICK_MS;
    use target_rush::sim::{
        AreaMissPolicy, Difficulty, Feedback, GameController, GamePhase, Playfield, Presenter,
        Target,
    };
    use target_rush::ui::{self, OverlayText, Tap, UiAction};
    use target_rush::{Settings, format_seconds};

    type SharedGame = Rc<RefCell<GameController<DomPresenter>>>;

    /// Milliseconds since page load
    fn now_ms() -> u64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() as u64)
            .unwrap_or(0)
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    /// Remove `el` after `delay_ms`
    fn remove_later(el: Element, delay_ms: i32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || el.remove());
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        );
        closure.forget();
    }

    /// Draws the game into the page's DOM
    struct DomPresenter {
        document: Document,
        container: Element,
        target_el: Option<Element>,
        /// Last tap position (client px), where feedback text appears
        pointer: (i32, i32),
    }

    impl DomPresenter {
        fn new(document: Document, container: Element) -> Self {
            Self {
                document,
                container,
                target_el: None,
                pointer: (0, 0),
            }
        }

        fn show_overlay(&self, text: &OverlayText, ended: bool) {
            set_text(&self.document, "overlayTitle", text.title);
            set_text(&self.document, "overlayMessage", &text.message);
            if let Some(btn) = self.document.get_element_by_id(ui::START_BUTTON_ID) {
                btn.set_text_content(Some(text.button));
                let classes = btn.class_list();
                let (add, remove) = if ended {
                    ("end-button", "start-button")
                } else {
                    ("start-button", "end-button")
                };
                let _ = classes.add_1(add);
                let _ = classes.remove_1(remove);
            }
            let selection = if ended { "none" } else { "block" };
            set_display(&self.document, "difficultySelection", selection);
            set_display(&self.document, "timeSelection", selection);
            set_display(&self.document, "finalScore", if ended { "block" } else { "none" });
            set_display(&self.document, ui::HOME_BUTTON_ID, if ended { "inline-block" } else { "none" });
            set_display(&self.document, "overlayGame", "flex");
        }

        /// The page ships without a home button; add it on first game over.
        /// Clicks reach it through the document-level tap listener.
        fn ensure_home_button(&self) {
            if self.document.get_element_by_id(ui::HOME_BUTTON_ID).is_some() {
                return;
            }
            let Some(parent) = self
                .document
                .query_selector(ui::OVERLAY_CONTENT_SELECTOR)
                .ok()
                .flatten()
            else {
                log::warn!("{} not found, no home button", ui::OVERLAY_CONTENT_SELECTOR);
                return;
            };
            let Ok(btn) = self.document.create_element("button") else {
                return;
            };
            btn.set_id(ui::HOME_BUTTON_ID);
            btn.set_class_name("end-button");
            btn.set_text_content(Some("🏠 Home"));
            let _ = parent.append_child(&btn);
        }
    }

    impl Presenter for DomPresenter {
        fn on_target_activated(&mut self, target: &Target) {
            let Ok(el) = self.document.create_element("div") else {
                log::error!("Failed to create target element");
                return;
            };
            el.set_class_name(&format!(
                "target target-{} target-{}",
                target.color.as_str(),
                target.size.as_str()
            ));
            let _ = el.set_attribute("data-target-id", &target.id.to_string());
            let _ = el.set_attribute(
                "style",
                &format!("left: {}px; top: {}px;", target.pos.x, target.pos.y),
            );
            let _ = self.container.append_child(&el);
            self.target_el = Some(el);
        }

        fn on_target_warning(&mut self, _target_id: u32) {
            if let Some(el) = &self.target_el {
                let _ = el.class_list().add_1("warning");
            }
        }

        fn on_target_deactivated(&mut self) {
            if let Some(el) = self.target_el.take() {
                el.remove();
            }
        }

        fn report_score(&mut self, score: u32) {
            set_text(&self.document, "scoreValue", &score.to_string());
        }

        fn report_miss(&mut self, miss_count: u32) {
            set_text(&self.document, "missValue", &miss_count.to_string());
        }

        fn report_combo(&mut self, combo: u32) {
            set_text(&self.document, "comboValue", &combo.to_string());
        }

        fn report_remaining_time(&mut self, remaining_ms: u64) {
            set_text(&self.document, "gameTimeValue", &format_seconds(remaining_ms));
        }

        fn report_phase(&mut self, phase: GamePhase) {
            match phase {
                GamePhase::Idle => self.show_overlay(&ui::overlay_text(phase, 0, 0), false),
                GamePhase::Running => set_display(&self.document, "overlayGame", "none"),
                GamePhase::Ended => {}
            }
        }

        fn report_game_ended(&mut self, final_score: u32, final_miss: u32) {
            self.ensure_home_button();
            self.show_overlay(
                &ui::overlay_text(GamePhase::Ended, final_score, final_miss),
                true,
            );
            set_text(
                &self.document,
                "finalScore",
                &format!("Final Score: {}", final_score),
            );
        }

        fn show_feedback(&mut self, feedback: Feedback) {
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            el.set_text_content(Some(&feedback.to_string()));

            if let Feedback::TimeUp { .. } = feedback {
                el.set_class_name("timer-warning");
                let _ = self.container.append_child(&el);
                remove_later(el, 500);
                return;
            }

            let kind = match feedback {
                Feedback::Miss { .. } => "miss",
                _ if feedback.is_combo() => "combo-bonus",
                _ => "success",
            };
            el.set_class_name(&format!("feedback {}", kind));
            let _ = el.set_attribute(
                "style",
                &format!(
                    "left: {}px; top: {}px; transform: translate(-50%, -50%);",
                    self.pointer.0, self.pointer.1
                ),
            );
            if let Some(body) = self.document.body() {
                let _ = body.append_child(&el);
            }
            remove_later(el, 600);
        }

        fn playfield(&self) -> Option<Playfield> {
            Some(playfield_of(&self.container))
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Target Rush starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(container) = document.get_element_by_id(ui::CONTAINER_ID) else {
            log::error!("#gameContainer not found");
            return;
        };

        let settings = Settings::load();
        mark_selected(&document, "#difficultySelection button", "data-difficulty", settings.difficulty.as_str());
        mark_selected(&document, "#timeSelection button", "data-time", &settings.duration_secs.to_string());
        mark_selected(&document, "#areaMissSelection button", "data-area-miss", settings.area_miss.as_str());

        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        log::info!("Game initialized with seed: {}", seed);
        let presenter = DomPresenter::new(document.clone(), container.clone());
        let game: SharedGame = Rc::new(RefCell::new(GameController::new(presenter, settings, seed)));

        setup_tap_input(&document, &container, game.clone());
        setup_selection_buttons(&document, game.clone());
        start_clock(game);

        log::info!("Target Rush running!");
    }

    fn playfield_of(container: &Element) -> Playfield {
        let rect = container.get_bounding_client_rect();
        let viewport = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(rect.width());
        Playfield::from_viewport(rect.width() as f32, rect.height() as f32, viewport as f32)
    }

    /// Route a tap on `target` into the game. Returns `false` if it was ignored.
    fn apply_tap(game: &SharedGame, container: &Element, target: Option<Element>, pointer: (i32, i32)) -> bool {
        let Some(el) = target else {
            return false;
        };
        let element_id = el.id();
        let target_id = el.get_attribute(ui::TARGET_ID_ATTR);
        let tap = Tap {
            element_id: &element_id,
            target_id: target_id.as_deref(),
            on_playfield: el == *container,
            in_overlay: el.closest(".overlay").ok().flatten().is_some(),
        };

        let action = ui::route_tap(&tap);
        if action == UiAction::Ignore {
            return false;
        }

        let mut g = game.borrow_mut();
        g.presenter_mut().pointer = pointer;
        let now = now_ms();
        match action {
            UiAction::Start => g.request_start(now),
            UiAction::Reset => g.request_reset(now),
            UiAction::Hit(id) => g.hit(id, now),
            UiAction::AreaMiss => g.area_miss(now),
            UiAction::Ignore => false,
        };
        true
    }

    /// One delegated listener per input kind, so elements created later
    /// (targets, the home button) need no wiring of their own
    fn setup_tap_input(document: &Document, container: &Element, game: SharedGame) {
        // Click (desktop)
        {
            let game = game.clone();
            let el = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
                apply_tap(&game, &el, target, (event.client_x(), event.client_y()));
            });
            let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end (phones); handled taps suppress the synthetic click
        {
            let el = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
                let pointer = event
                    .changed_touches()
                    .get(0)
                    .map(|t| (t.client_x(), t.client_y()))
                    .unwrap_or((0, 0));
                if apply_tap(&game, &el, target, pointer) {
                    event.prevent_default();
                    event.stop_propagation();
                }
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = container.add_event_listener_with_callback_and_add_event_listener_options(
                "touchend",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    /// Toggle the `selected` class so only the button whose `attr` equals `value` has it
    fn mark_selected(document: &Document, selector: &str, attr: &str, value: &str) {
        let Ok(buttons) = document.query_selector_all(selector) else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let classes = btn.class_list();
            if btn.get_attribute(attr).as_deref() == Some(value) {
                let _ = classes.add_1("selected");
            } else {
                let _ = classes.remove_1("selected");
            }
        }
    }

    fn setup_selection_buttons(document: &Document, game: SharedGame) {
        let Ok(buttons) = document.query_selector_all(
            "#difficultySelection button, #timeSelection button, #areaMissSelection button",
        ) else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let game = game.clone();
            let el = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if let Some(key) = el.get_attribute("data-difficulty") {
                    let Some(difficulty) = Difficulty::from_str(&key) else {
                        log::warn!("Unknown difficulty: {}", key);
                        return;
                    };
                    if g.select_difficulty(difficulty) {
                        mark_selected(&document, "#difficultySelection button", "data-difficulty", &key);
                        g.settings().save();
                    }
                } else if let Some(secs) = el.get_attribute("data-time") {
                    match secs.parse::<u32>() {
                        Ok(secs) if g.select_duration(secs) => {
                            mark_selected(&document, "#timeSelection button", "data-time", &secs.to_string());
                            g.settings().save();
                        }
                        Ok(_) => {}
                        Err(_) => log::warn!("Bad duration: {}", secs),
                    }
                } else if let Some(key) = el.get_attribute("data-area-miss") {
                    let Some(policy) = AreaMissPolicy::from_str(&key) else {
                        log::warn!("Unknown area-miss policy: {}", key);
                        return;
                    };
                    if g.select_area_miss_policy(policy) {
                        mark_selected(&document, "#areaMissSelection button", "data-area-miss", policy.as_str());
                        g.settings().save();
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drive timers from a browser interval
    fn start_clock(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().advance(now_ms());
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CLOCK_TICK_MS as i32,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use target_rush::Settings;
    use target_rush::consts::CLOCK_TICK_MS;
    use target_rush::format_seconds;
    use target_rush::sim::{Difficulty, Feedback, GameController, GamePhase, Presenter, Target};

    /// Logs what a player would see
    #[derive(Default)]
    pub struct LogPresenter {
        pub spawned: u32,
    }

    impl Presenter for LogPresenter {
        fn on_target_activated(&mut self, target: &Target) {
            self.spawned += 1;
            log::debug!(
                "Target {} ({} {}) at ({:.0}, {:.0})",
                target.id,
                target.color.as_str(),
                target.size.as_str(),
                target.pos.x,
                target.pos.y
            );
        }

        fn show_feedback(&mut self, feedback: Feedback) {
            log::debug!("{}", feedback);
        }

        fn report_game_ended(&mut self, final_score: u32, final_miss: u32) {
            log::info!("Game Over! Final score {}, missed {}", final_score, final_miss);
        }
    }

    /// Simulated player's next tap
    #[derive(Clone, Copy)]
    struct PlannedTap {
        at_ms: u64,
        target_id: u32,
        /// Tap empty space instead of the target
        fumble: bool,
    }

    /// Play one round with a simulated player on a virtual clock
    pub fn run(difficulty: Difficulty, duration_secs: u32, seed: u64) -> (u32, u32) {
        let settings = Settings {
            difficulty,
            duration_secs,
            ..Settings::default()
        };
        let mut game = GameController::new(LogPresenter::default(), settings, seed);
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);

        let mut now = 0;
        game.request_start(now);
        log::info!(
            "Autoplay: {} for {}s",
            difficulty.as_str(),
            format_seconds(game.remaining_ms())
        );

        let mut plan: Option<PlannedTap> = None;
        while game.phase() == GamePhase::Running {
            now += CLOCK_TICK_MS;
            game.advance(now);

            let Some(live) = game.current_target().map(|t| t.id) else {
                continue;
            };
            if plan.is_none_or(|p| p.target_id != live) {
                plan = Some(PlannedTap {
                    at_ms: now + player.random_range(250..2_600),
                    target_id: live,
                    fumble: player.random_bool(0.1),
                });
            }
            if let Some(tap) = plan.filter(|p| now >= p.at_ms) {
                if tap.fumble {
                    game.area_miss(now);
                } else {
                    game.hit(tap.target_id, now);
                }
                plan = None;
            }
        }

        log::info!("Targets spawned: {}", game.presenter().spawned);
        (game.state().score, game.state().miss_count)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Target Rush (native) starting...");
    log::info!("Native mode plays a scripted round - run with `trunk serve` for web version");

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(key) => match target_rush::sim::Difficulty::from_str(&key) {
            Some(d) => d,
            None => {
                log::error!("Unknown difficulty '{}', expected easy, normal or hard", key);
                std::process::exit(2);
            }
        },
        None => target_rush::sim::Difficulty::default(),
    };
    let duration_secs = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(target_rush::consts::DEFAULT_DURATION_SECS);

    let (score, misses) = autoplay::run(difficulty, duration_secs, 12345);
    println!("Final Score: {} (missed {})", score, misses);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
