//! Configuration management for squeeze.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and destination directories
    pub general: GeneralConfig,

    /// Quality ladder, budget and normalization settings
    pub compression: CompressionConfig,

    /// Source file discovery
    pub discovery: DiscoveryConfig,

    /// Report output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Ordered job list: logical name to destination file name
    pub jobs: Vec<JobConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            compression: CompressionConfig::default(),
            discovery: DiscoveryConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            jobs: default_jobs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.squeeze.squeeze/config.toml
    /// - Linux: ~/.config/squeeze/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\squeeze\config\config.toml
    ///
    /// Falls back to ~/.squeeze/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "squeeze", "squeeze")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".squeeze").join("config.toml")
            })
    }

    /// Resolved source directory (with ~ expansion).
    pub fn source_dir(&self) -> PathBuf {
        expand(&self.general.source_dir)
    }

    /// Resolved destination directory (with ~ expansion).
    pub fn dest_dir(&self) -> PathBuf {
        expand(&self.general.dest_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
