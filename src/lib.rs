//! Target Rush - A tap-the-target reaction game
//!
//! Core modules:
//! - `sim`: Deterministic game core (state machine, timers, scoring)
//! - `settings`: Player selections persisted between visits
//! - `ui`: Page element ids, overlay copy and tap routing

pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown refresh period (ms)
    pub const CLOCK_TICK_MS: u64 = 10;

    /// Round length used until the player picks another one
    pub const DEFAULT_DURATION_SECS: u32 = 30;

    /// Gap kept between a target and the playfield edge (px)
    pub const PLAYFIELD_MARGIN: f32 = 20.0;
    /// Viewports wider than this use the desktop target sizes
    pub const DESKTOP_BREAKPOINT: f32 = 768.0;

    /// Target edge lengths on desktop (px)
    pub const TARGET_PX_DESKTOP: [f32; 3] = [40.0, 60.0, 80.0];
    /// Target edge lengths on phones, larger for thumbs (px)
    pub const TARGET_PX_COMPACT: [f32; 3] = [55.0, 75.0, 95.0];
}

/// Seconds with two decimals, as shown on the countdown display
#[inline]
pub fn format_seconds(ms: u64) -> String {
    format!("{:.2}", ms as f64 / 1000.0)
}
