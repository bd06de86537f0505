//! Analytics configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults of the engine.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::correlation::CorrelationConfig;
use crate::patterns::DetectionThresholds;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Offset used to derive calendar dates; host local offset when unset
    pub utc_offset_minutes: Option<i32>,
    pub correlation: CorrelationConfig,
    pub patterns: DetectionThresholds,
}

impl AnalyticsConfig {
    /// Resolve the configured offset.
    ///
    /// Offsets must lie strictly within a day.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        match self.utc_offset_minutes {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or(ConfigError::InvalidOffset(minutes)),
            None => Ok(Local::now().offset().fix()),
        }
    }

    /// Parse a config from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        // Offset must be valid at load time
        config.offset()?;
        Ok(config)
    }
}

/// Get the default config path
pub fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("moodlog").join("config.json")
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default path is used if
/// present and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !required && !path.exists() {
        tracing::debug!("No config at {:?}, using defaults", path);
        return Ok(AnalyticsConfig::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let config = AnalyticsConfig::from_json(&text)?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}
