//! Page wiring shared by the web front end
//!
//! Element ids, overlay copy and tap routing. Kept free of `web_sys` so the
//! rules can be tested natively.

use crate::sim::GamePhase;

pub const CONTAINER_ID: &str = "gameContainer";
pub const START_BUTTON_ID: &str = "startButton";
/// Created on first game over, inside `.overlay-content`
pub const HOME_BUTTON_ID: &str = "homeButton";
pub const OVERLAY_CONTENT_SELECTOR: &str = ".overlay-content";

/// Attribute carrying the id of a target element
pub const TARGET_ID_ATTR: &str = "data-target-id";

/// What a click or tap asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Reset,
    Hit(u32),
    AreaMiss,
    Ignore,
}

/// The element a tap landed on
#[derive(Debug, Clone, Copy, Default)]
pub struct Tap<'a> {
    /// Element id attribute (empty if none)
    pub element_id: &'a str,
    /// Value of `data-target-id`, if the element is a target
    pub target_id: Option<&'a str>,
    /// Tap landed directly on the playfield background
    pub on_playfield: bool,
    /// Element sits inside an overlay
    pub in_overlay: bool,
}

/// Map a tap to a game action
pub fn route_tap(tap: &Tap<'_>) -> UiAction {
    match tap.element_id {
        START_BUTTON_ID => return UiAction::Start,
        HOME_BUTTON_ID => return UiAction::Reset,
        _ => {}
    }
    if let Some(id) = tap.target_id {
        return id.parse().map(UiAction::Hit).unwrap_or(UiAction::Ignore);
    }
    if tap.in_overlay {
        return UiAction::Ignore;
    }
    if tap.on_playfield {
        UiAction::AreaMiss
    } else {
        UiAction::Ignore
    }
}

/// Overlay title, message and start-button label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayText {
    pub title: &'static str,
    pub message: String,
    pub button: &'static str,
}

/// Overlay copy for the start screen (`Idle`) or the game-over screen (`Ended`)
pub fn overlay_text(phase: GamePhase, final_score: u32, final_miss: u32) -> OverlayText {
    match phase {
        GamePhase::Ended => OverlayText {
            title: "Game Over!",
            message: format!(
                "Time is up! You hit {} targets. Missed: {}.",
                final_score, final_miss
            ),
            button: "Play Again",
        },
        _ => OverlayText {
            title: "Ready to start?",
            message: "Tap targets as fast as you can!".to_string(),
            button: "Start Game",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_button_resets() {
        let tap = Tap {
            element_id: HOME_BUTTON_ID,
            in_overlay: true,
            ..Default::default()
        };
        assert_eq!(route_tap(&tap), UiAction::Reset);
    }

    #[test]
    fn test_start_button_inside_overlay_starts() {
        let tap = Tap {
            element_id: START_BUTTON_ID,
            in_overlay: true,
            ..Default::default()
        };
        assert_eq!(route_tap(&tap), UiAction::Start);
    }

    #[test]
    fn test_target_and_playfield_taps() {
        let hit = Tap {
            target_id: Some("7"),
            ..Default::default()
        };
        assert_eq!(route_tap(&hit), UiAction::Hit(7));

        let garbled = Tap {
            target_id: Some("seven"),
            ..Default::default()
        };
        assert_eq!(route_tap(&garbled), UiAction::Ignore);

        let empty = Tap {
            element_id: CONTAINER_ID,
            on_playfield: true,
            ..Default::default()
        };
        assert_eq!(route_tap(&empty), UiAction::AreaMiss);
    }

    #[test]
    fn test_overlay_and_stray_taps_ignored() {
        let overlay = Tap {
            on_playfield: true,
            in_overlay: true,
            ..Default::default()
        };
        assert_eq!(route_tap(&overlay), UiAction::Ignore);
        assert_eq!(route_tap(&Tap::default()), UiAction::Ignore);
    }

    #[test]
    fn test_overlay_text() {
        let over = overlay_text(GamePhase::Ended, 42, 3);
        assert_eq!(over.title, "Game Over!");
        assert_eq!(over.message, "Time is up! You hit 42 targets. Missed: 3.");
        assert_eq!(over.button, "Play Again");

        let ready = overlay_text(GamePhase::Idle, 0, 0);
        assert_eq!(ready.title, "Ready to start?");
        assert_eq!(ready.button, "Start Game");
    }
}
