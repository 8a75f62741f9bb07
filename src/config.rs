//! Session configuration
//!
//! JSON file with every field optional; missing fields take the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::audio::{WavBackend, DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use crate::catalog::SoundCatalog;
use crate::error::{AmbientError, Result};
use crate::mix::{Volume, DEFAULT_LAYER_VOLUME, DEFAULT_MASTER_VOLUME, DEFAULT_SEASON_VOLUME};
use crate::timer::{SessionTimer, DEFAULT_DURATION_PRESETS, DEFAULT_DURATION_SECS};

/// Tunables for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory source refs resolve against
    pub asset_root: PathBuf,
    /// Render rate of the WAV backend in Hz
    pub sample_rate: u32,
    pub master_volume: Volume,
    /// Individual volume of every season track
    pub season_volume: Volume,
    /// Individual volume of newly added layers
    pub layer_volume: Volume,
    pub default_duration_secs: u32,
    pub duration_presets_secs: Vec<u32>,
    /// Nominal period of the session ticker
    pub tick_interval_ms: u64,
    /// Custom catalog replacing the builtin one
    pub catalog_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            sample_rate: DEFAULT_SAMPLE_RATE,
            master_volume: DEFAULT_MASTER_VOLUME,
            season_volume: DEFAULT_SEASON_VOLUME,
            layer_volume: DEFAULT_LAYER_VOLUME,
            default_duration_secs: DEFAULT_DURATION_SECS,
            duration_presets_secs: DEFAULT_DURATION_PRESETS.to_vec(),
            tick_interval_ms: 1000,
            catalog_path: None,
        }
    }
}

impl SessionConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AmbientError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| AmbientError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: SessionConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(invalid(&format!(
                "sample_rate {} outside {}-{} Hz",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms must be positive"));
        }
        if self.duration_presets_secs.is_empty() {
            return Err(invalid("duration_presets_secs must not be empty"));
        }
        if self.duration_presets_secs.contains(&0) {
            return Err(invalid("duration_presets_secs must not contain 0"));
        }
        if !self.duration_presets_secs.contains(&self.default_duration_secs) {
            return Err(invalid(&format!(
                "default_duration_secs {} is not one of {:?}",
                self.default_duration_secs, self.duration_presets_secs
            )));
        }
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fresh timer with the configured duration and presets
    pub fn timer(&self) -> Result<SessionTimer> {
        SessionTimer::with_presets(self.default_duration_secs, &self.duration_presets_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The configured catalog, or the builtin one
    pub fn catalog(&self) -> Result<SoundCatalog> {
        match &self.catalog_path {
            Some(path) => SoundCatalog::from_json_file(path),
            None => Ok(SoundCatalog::builtin()),
        }
    }

    pub fn wav_backend(&self) -> WavBackend {
        WavBackend::new(self.asset_root.clone(), self.sample_rate)
    }
}

fn invalid(reason: &str) -> AmbientError {
    AmbientError::InvalidConfig {
        reason: reason.to_string(),
    }
}
