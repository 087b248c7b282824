//! squeeze core - recompress images until they fit a file-size budget.
//!
//! Each job decodes one source image, flattens any transparency onto a fixed
//! background, and re-encodes it as JPEG at decreasing quality until the output
//! is strictly smaller than the budget.
//!
//! ```text
//! Locate source → Decode → Normalize → Encode@95 → Encode@90 → ... → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use squeeze_core::{CompressionJob, Recompressor};
//!
//! let job = CompressionJob::new("hero_final_123.png", "public/hero.png", 250 * 1024);
//! let report = Recompressor::default().compress(&job)?;
//! println!("{report}");
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use output::{OutputFormat, ReportWriter};
pub use pipeline::{JobRunner, QualityLadder, Recompressor, SourceLocator};
pub use types::{CompressionJob, CompressionReport, JobRecord, JobStatus, Outcome, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_runner_from_default_config() {
        let runner = JobRunner::new(&Config::default()).unwrap();
        assert_eq!(runner.jobs().len(), 6);
    }
}
