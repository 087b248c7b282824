//! Configuration validation with range checks.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::{parse_hex_color, Config};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.compression;
        if c.max_size_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "compression.max_size_bytes must be > 0".into(),
            ));
        }
        if c.start_quality == 0 || c.start_quality > 100 {
            return Err(ConfigError::ValidationError(
                "compression.start_quality must be between 1 and 100".into(),
            ));
        }
        if c.quality_step == 0 {
            return Err(ConfigError::ValidationError(
                "compression.quality_step must be > 0".into(),
            ));
        }
        if c.min_quality >= c.start_quality {
            return Err(ConfigError::ValidationError(
                "compression.min_quality must be < compression.start_quality".into(),
            ));
        }
        if parse_hex_color(&c.background).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "compression.background {:?} is not a #rrggbb color",
                c.background
            )));
        }

        if !self.discovery.pattern.contains("{name}") {
            return Err(ConfigError::ValidationError(
                "discovery.pattern must contain {name}".into(),
            ));
        }

        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format {:?} must be json or jsonl",
                self.output.format
            )));
        }

        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level {:?} must be one of: {}",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format {:?} must be pretty or json",
                self.logging.format
            )));
        }

        let mut targets = HashSet::new();
        for job in &self.jobs {
            if job.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "jobs.name must not be empty".into(),
                ));
            }
            if job.target.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "jobs.target must not be empty (job {:?})",
                    job.name
                )));
            }
            if job.max_size_bytes == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "jobs.max_size_bytes must be > 0 (job {:?})",
                    job.name
                )));
            }
            if !targets.insert(job.target.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "jobs.target {:?} is used by more than one job",
                    job.target
                )));
            }
        }
        Ok(())
    }
}
