//! Core data types: jobs going into the recompressor and reports coming out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::pipeline::QualityLadder;

/// One recompression request. Immutable for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionJob {
    /// Image to read
    pub source: PathBuf,
    /// Where the JPEG bytes go, whatever its extension says
    pub dest: PathBuf,
    /// Output must be strictly smaller than this
    pub max_size_bytes: u64,
    /// Quality levels to try
    pub ladder: QualityLadder,
}

impl CompressionJob {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>, max_size_bytes: u64) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            max_size_bytes,
            ladder: QualityLadder::default(),
        }
    }

    pub fn with_ladder(mut self, ladder: QualityLadder) -> Self {
        self.ladder = ladder;
        self
    }
}

/// How the quality search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Highest level whose output fit the budget
    Accepted { quality: u8, size: u64 },
    /// Nothing fit; the lowest level tried and its size
    Exhausted { quality: u8, size: u64 },
}

impl Outcome {
    pub fn quality(&self) -> u8 {
        match *self {
            Self::Accepted { quality, .. } | Self::Exhausted { quality, .. } => quality,
        }
    }

    pub fn size(&self) -> u64 {
        match *self {
            Self::Accepted { size, .. } | Self::Exhausted { size, .. } => size,
        }
    }

    pub fn budget_met(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// What one `Recompressor::compress` call did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionReport {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Source dimensions in pixels
    pub width: u32,
    pub height: u32,
    /// Whether an alpha channel was flattened onto the background
    pub flattened_alpha: bool,
    pub max_size_bytes: u64,
    /// Number of encodes performed
    pub attempts: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

impl CompressionReport {
    /// File name of the destination, for console output.
    pub fn dest_name(&self) -> String {
        file_name(&self.dest)
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.dest_name();
        match self.outcome {
            Outcome::Accepted { quality, size } => write!(
                f,
                "Success: {name} | Size: {:.2} KB | Quality: {quality}",
                kib(size)
            ),
            Outcome::Exhausted { size, .. } => write!(
                f,
                "Warning: Could not compress {name} below {}KB. Current: {:.2}KB",
                budget_kib(self.max_size_bytes),
                kib(size)
            ),
        }
    }
}

/// Per-job status for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobStatus {
    /// The recompressor ran; the report says whether the budget was met
    Compressed(CompressionReport),
    /// No source matched the discovery pattern
    Skipped,
    /// Decoding, encoding or writing failed
    Failed { error: String },
}

/// One line of a run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Logical job name
    pub name: String,
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, JobStatus::Failed { .. })
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            JobStatus::Compressed(report) => fmt::Display::fmt(report, f),
            JobStatus::Skipped => write!(f, "Skipping {}: No source file found.", self.name),
            JobStatus::Failed { error } => write!(f, "Failed: {}: {}", self.name, error),
        }
    }
}

/// Counts over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub over_budget: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_records(records: &[JobRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match &record.status {
                JobStatus::Compressed(r) if r.outcome.budget_met() => summary.succeeded += 1,
                JobStatus::Compressed(_) => summary.over_budget += 1,
                JobStatus::Skipped => summary.skipped += 1,
                JobStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn kib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

// Whole KB budgets print without decimals ("250KB").
fn budget_kib(bytes: u64) -> String {
    if bytes % 1024 == 0 {
        (bytes / 1024).to_string()
    } else {
        format!("{:.2}", kib(bytes))
    }
}
