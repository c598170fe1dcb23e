//! Player selections (difficulty, round length)
//!
//! Persisted in LocalStorage so the start overlay remembers the last choice.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DURATION_SECS;
use crate::sim::{AreaMissPolicy, Difficulty};

/// Round lengths offered on the start overlay (seconds)
pub const DURATION_CHOICES: [u32; 3] = [15, 30, 60];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Selected difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Round length in seconds (always > 0)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    /// What an empty-area tap does to the live target
    #[serde(default)]
    pub area_miss: AreaMissPolicy,
}

fn default_duration_secs() -> u32 {
    DEFAULT_DURATION_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            duration_secs: DEFAULT_DURATION_SECS,
            area_miss: AreaMissPolicy::default(),
        }
    }
}

impl Settings {
    pub fn duration_ms(&self) -> u64 {
        self.duration_secs as u64 * 1000
    }

    /// Parse stored JSON, falling back to defaults for anything unusable
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Settings = serde_json::from_str(json).ok()?;
        if settings.duration_secs == 0 {
            settings.duration_secs = DEFAULT_DURATION_SECS;
        }
        Some(settings)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "target_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            duration_secs: 60,
            area_miss: AreaMissPolicy::KeepTarget,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), Some(settings));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"Easy"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.duration_secs, DEFAULT_DURATION_SECS);
        assert_eq!(settings.area_miss, AreaMissPolicy::Respawn);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let settings = Settings::from_json(r#"{"duration_secs":0}"#).unwrap();
        assert_eq!(settings.duration_secs, DEFAULT_DURATION_SECS);
        assert!(Settings::from_json("not json").is_none());
    }
}
