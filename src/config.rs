//! Configuration file handling for video-weaver.
//!
//! Loads configuration from `~/.config/video-weaver/config.toml` or a custom
//! path. Every field is optional; the CLI merges values as CLI args > config
//! file > built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration file structure for video-weaver.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Default generation parameters (`[generation]` section).
#[derive(Debug, Deserialize, Default)]
pub struct GenerationConfig {
    /// Model short name or full identifier ("fast", "quality", ...).
    pub model: Option<String>,
    /// "16:9" or "9:16".
    pub aspect_ratio: Option<String>,
    /// "720p" or "1080p".
    pub resolution: Option<String>,
    /// Clip length in seconds.
    pub duration_secs: Option<u32>,
}

/// API plumbing overrides (`[api]` section).
#[derive(Debug, Deserialize, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

/// Default config file location: `~/.config/video-weaver/config.toml`.
fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("video-weaver")
        .join("config.toml")
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist, and an error if the file
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_path())
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from_explicit(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
