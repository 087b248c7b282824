//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::pipeline::QualityLadder;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory searched for source images
    pub source_dir: PathBuf,

    /// Directory the recompressed images are written to
    pub dest_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            dest_dir: PathBuf::from("public"),
        }
    }
}

/// How attempts are written while searching the quality ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Every attempt overwrites the destination; size is read back from disk.
    #[default]
    Overwrite,
    /// Attempts stay in memory; only the chosen bytes are written, once.
    Buffered,
}

/// Recompression settings shared by every job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Size budget in bytes; output must be strictly smaller
    pub max_size_bytes: u64,

    /// First JPEG quality tried
    pub start_quality: u8,

    /// Amount quality drops between attempts
    pub quality_step: u8,

    /// Exclusive floor: quality never reaches this value
    pub min_quality: u8,

    /// Background composited under transparent pixels ("#rrggbb")
    pub background: String,

    /// Write attempts in place or only the final result
    pub write_mode: WriteMode,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 250 * 1024,
            start_quality: 95,
            quality_step: 5,
            min_quality: 10,
            background: "#1a0a2e".to_string(),
            write_mode: WriteMode::Overwrite,
        }
    }
}

impl CompressionConfig {
    /// The quality ladder described by these settings.
    pub fn ladder(&self) -> QualityLadder {
        QualityLadder::new(self.start_quality, self.quality_step, self.min_quality)
    }

    /// Parse the configured background color.
    pub fn background_rgb(&self) -> Result<[u8; 3], ConfigError> {
        parse_hex_color(&self.background)
    }
}

/// Source discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File name pattern; `{name}` is replaced by the job name,
    /// `*` and `?` are wildcards
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pattern: "{name}_*.png".to_string(),
        }
    }
}

/// One logical job: which sources to look for and what to call the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Logical name substituted into the discovery pattern
    pub name: String,

    /// Output file name inside `general.dest_dir`
    pub target: String,

    /// Per-job budget overriding `compression.max_size_bytes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

impl JobConfig {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            max_size_bytes: None,
        }
    }
}

/// The stock asset set: generated images mapped onto fixed public names.
pub fn default_jobs() -> Vec<JobConfig> {
    [
        ("icon_final", "icon.png"),
        ("hero_final", "hero.png"),
        ("og_image_final", "og-image.png"),
        ("image_final", "image.png"),
        ("splash_final", "splash.png"),
        ("screenshot_final", "screenshot.png"),
    ]
    .into_iter()
    .map(|(name, target)| JobConfig::new(name, target))
    .collect()
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Parse a `#rrggbb` (or `rrggbb`) color string.
pub fn parse_hex_color(s: &str) -> Result<[u8; 3], ConfigError> {
    let trimmed = s.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || ConfigError::ValidationError(format!("invalid color {s:?}, expected #rrggbb"));

    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1a0a2e").unwrap(), [26, 10, 46]);
        assert_eq!(parse_hex_color("FFFFFF").unwrap(), [255, 255, 255]);
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#zz0000").is_err());
        assert!(parse_hex_color("#ééé").is_err());
        assert!(parse_hex_color("##1a0a2e").is_err());
    }

    #[test]
    fn test_default_jobs_order() {
        let jobs = default_jobs();
        let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "icon_final",
                "hero_final",
                "og_image_final",
                "image_final",
                "splash_final",
                "screenshot_final"
            ]
        );
        assert_eq!(jobs[2].target, "og-image.png");
    }

    #[test]
    fn test_write_mode_serde() {
        #[derive(Deserialize)]
        struct Wrap {
            mode: WriteMode,
        }
        let w: Wrap = toml::from_str("mode = \"buffered\"").unwrap();
        assert_eq!(w.mode, WriteMode::Buffered);
    }
}
