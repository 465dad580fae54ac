//! Workbench settings.
//!
//! On the web, settings are persisted to localStorage so they survive page
//! reloads. Native builds read an optional JSON file named by
//! `DERAIN_WORKBENCH_SETTINGS` and otherwise use defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-facing and processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSettings {
    /// Dark theme instead of light.
    pub dark_mode: bool,
    /// Artificial latency of the simulated deraining service.
    pub simulated_delay_ms: u64,
    /// Requests taking longer than this fail with a timeout.
    pub timeout_ms: u64,
    /// Largest input the service accepts.
    pub max_input_bytes: usize,
    /// Gaussian sigma applied by the simulated service (0 disables it).
    pub smoothing_sigma: f32,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            simulated_delay_ms: 2000,
            timeout_ms: 30_000,
            max_input_bytes: 20 * 1024 * 1024, // 20 MB
            smoothing_sigma: 0.8,
        }
    }
}

impl WorkbenchSettings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "derain_workbench_settings";

    /// Environment variable naming a native settings file.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    const SETTINGS_ENV: &'static str = "DERAIN_WORKBENCH_SETTINGS";

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse settings from JSON, falling back to defaults on error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded settings from localStorage");
                Self::from_json(&json)
            }
            _ => Self::default(),
        }
    }

    /// Load settings from the file named by the settings environment variable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::SETTINGS_ENV) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path);
                Self::from_json(&json)
            }
            Err(e) => {
                log::warn!("Failed to read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save settings: {:?}", e);
        } else {
            log::debug!("Saved settings to localStorage");
        }
    }

    /// Native settings are session-scoped; nothing is written back.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings changed (dark_mode={})", self.dark_mode);
    }
}
