//! Game settings
//!
//! Loaded once at startup. Native builds read a JSON file, web builds read
//! LocalStorage. Any failure falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, MAX_FRAME_MS};

/// How per-step random chances (patrol turns, boss rings, shooter fire) scale
/// with frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChanceMode {
    /// Fixed probability per step, whatever the frame rate
    PerFrame,
    /// Probability per 60 Hz frame, rescaled to the actual step length
    #[default]
    TimeNormalized,
}

impl ChanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChanceMode::PerFrame => "per-frame",
            ChanceMode::TimeNormalized => "time-normalized",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "per-frame" | "frame" => Some(ChanceMode::PerFrame),
            "time-normalized" | "time" | "normalized" => Some(ChanceMode::TimeNormalized),
            _ => None,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena width (px)
    pub arena_width: f32,
    /// Arena height (px)
    pub arena_height: f32,
    /// Frame deltas above this are clamped (ms)
    pub max_frame_ms: f32,
    /// Scaling of per-step random chances
    pub chance_mode: ChanceMode,
    /// Difficulty used when the host does not ask the player
    pub default_difficulty: String,
    /// Forward feedback events to the vibration motor
    pub haptics: bool,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            max_frame_ms: MAX_FRAME_MS,
            chance_mode: ChanceMode::default(),
            default_difficulty: "easy".to_string(),
            haptics: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Replace nonsensical values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.arena_width.is_finite() && self.arena_width >= 100.0) {
            log::warn!("Invalid arena width {}, using default", self.arena_width);
            self.arena_width = defaults.arena_width;
        }
        if !(self.arena_height.is_finite() && self.arena_height >= 100.0) {
            log::warn!("Invalid arena height {}, using default", self.arena_height);
            self.arena_height = defaults.arena_height;
        }
        if !(self.max_frame_ms.is_finite() && self.max_frame_ms > 0.0) {
            log::warn!("Invalid frame clamp {}, using default", self.max_frame_ms);
            self.max_frame_ms = defaults.max_frame_ms;
        }
        self
    }

    /// Parse settings from JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Could not parse settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sd_settings";

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Could not save settings: {e}");
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match serde_json::to_string(self) {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(_) => log::warn!("Could not write settings to LocalStorage"),
                },
                Err(e) => log::warn!("Could not serialize settings: {e}"),
            }
        }
    }
}
