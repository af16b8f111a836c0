use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Read once at startup and never written back: slider movements are not
/// persisted anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub speech: SpeechConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Initial positions for the speech sliders. Values outside the slider
/// ranges are clamped when the form is built. The speed slider is not
/// configurable here; its starting point is the platform's normal rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Initial volume, 0.0 - 1.0.
    pub volume: f32,
    /// Initial pitch multiplier, 0.5 - 5.5.
    pub pitch: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tui: TuiConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { volume: 0.8, pitch: 0.8 }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/stts/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("stts").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
