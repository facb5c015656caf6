//! Configuration loading for djmix
//!
//! Mix settings come from a small TOML file. Resolution order:
//! 1. Explicit path (command-line `--config`), which must exist
//! 2. `DJMIX_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/djmix/config.toml` on Linux)
//! 4. Built-in defaults
//!
//! A missing optional file is not an error: a warning is logged and the
//! built-in defaults are used. Command-line flags are applied on top by the
//! caller.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "DJMIX_CONFIG";

/// Mixing defaults, overridable per run from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Snap the splice to the nearest beat of the outgoing track
    pub sync_beats: bool,

    /// Time-stretch incoming tracks to the first track's tempo
    pub match_tempo: bool,

    /// Log a warning when adjacent tracks have clashing keys
    pub harmonic_mix: bool,

    /// Crossfade length in bars
    pub transition_bars: u32,

    /// Blend style name (`classic`, `bass_swap`, `filter_sweep`)
    pub transition_style: String,

    /// Pick splice points from the song structure (otherwise mix out
    /// `transition_bars` before the end of the outgoing track)
    pub auto_detect: bool,

    /// Loudness target for the final normalization pass (dBFS RMS)
    pub target_db: f64,

    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            sync_beats: true,
            match_tempo: true,
            harmonic_mix: true,
            transition_bars: 16,
            transition_style: "classic".to_string(),
            auto_detect: true,
            target_db: -14.0,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MixSettings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: MixSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve and load settings following the documented priority order.
    ///
    /// `explicit` is the command-line path; it must exist when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(env_path);
            if path.exists() {
                info!("Loading config from ${} ({})", CONFIG_ENV_VAR, path.display());
                return Self::from_file(&path);
            }
            warn!(
                "${} points to missing file {}, ignoring",
                CONFIG_ENV_VAR,
                path.display()
            );
        }

        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            info!("Loading config from {}", path.display());
            return Self::from_file(&path);
        }

        warn!("No config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.transition_bars == 0 {
            return Err(Error::Config(
                "transition_bars must be at least 1".to_string(),
            ));
        }
        if !self.target_db.is_finite() {
            return Err(Error::Config(format!(
                "target_db must be finite, got {}",
                self.target_db
            )));
        }
        Ok(())
    }
}

/// Platform config file location (`<config_dir>/djmix/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("djmix").join("config.toml"))
}
