//! Host settings
//!
//! Native builds read a JSON file named by `HIVE_MEADOW_SETTINGS`; web
//! builds read LocalStorage. Both fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::tuning::Tuning;

/// Environment variable naming the native settings file
pub const SETTINGS_ENV: &str = "HIVE_MEADOW_SETTINGS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Placement seed; None derives one from the clock
    pub seed: Option<u64>,
    pub tuning: Tuning,

    // === Headless (native) run ===
    /// Frames to simulate before exiting
    pub headless_frames: u64,
    /// Synthetic refresh rate for headless timestamps
    pub headless_fps: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tuning: Tuning::default(),
            headless_frames: 60 * 120,
            headless_fps: 60.0,
        }
    }
}

impl Settings {
    /// Parse settings JSON and validate the embedded tuning
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        if !(settings.headless_fps > 0.0) {
            return Err(SimError::InvalidTuning(format!(
                "headless_fps must be positive, got {}",
                settings.headless_fps
            )));
        }
        Ok(settings)
    }

    /// Read and parse a settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hive_meadow_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `HIVE_MEADOW_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Seed to run with, given a fallback from the host clock
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}
