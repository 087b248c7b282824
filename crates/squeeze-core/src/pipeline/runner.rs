//! Sequential job runner: resolve each configured job's source, recompress
//! it, and record what happened without letting one job stop the others.

use std::path::PathBuf;

use crate::config::{Config, JobConfig};
use crate::error::ConfigError;
use crate::types::{CompressionJob, JobRecord, JobStatus};

use super::discovery::SourceLocator;
use super::ladder::QualityLadder;
use super::recompress::Recompressor;

/// Runs configured jobs one after another.
#[derive(Debug, Clone)]
pub struct JobRunner {
    locator: SourceLocator,
    recompressor: Recompressor,
    dest_dir: PathBuf,
    max_size_bytes: u64,
    ladder: QualityLadder,
    jobs: Vec<JobConfig>,
}

impl JobRunner {
    /// Create a runner for every job in `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            locator: SourceLocator::new(config.source_dir(), config.discovery.pattern.clone()),
            recompressor: Recompressor::from_config(&config.compression)?,
            dest_dir: config.dest_dir(),
            max_size_bytes: config.compression.max_size_bytes,
            ladder: config.compression.ladder(),
            jobs: config.jobs.clone(),
        })
    }

    /// Configured jobs, in run order.
    pub fn jobs(&self) -> &[JobConfig] {
        &self.jobs
    }

    /// Keep only the named jobs, preserving configured order.
    ///
    /// Returns the names that matched no job.
    pub fn retain_jobs(&mut self, names: &[String]) -> Vec<String> {
        let unknown = names
            .iter()
            .filter(|n| !self.jobs.iter().any(|j| &j.name == *n))
            .cloned()
            .collect();
        self.jobs.retain(|j| names.contains(&j.name));
        unknown
    }

    /// Destination path for a job.
    pub fn dest_for(&self, job: &JobConfig) -> PathBuf {
        self.dest_dir.join(&job.target)
    }

    /// Run every job in order.
    pub fn run_all(&self) -> Vec<JobRecord> {
        self.jobs.iter().map(|job| self.run_job(job)).collect()
    }

    /// Run a single job. Never fails: problems are captured in the record.
    pub fn run_job(&self, job: &JobConfig) -> JobRecord {
        let status = self.execute(job);
        match &status {
            JobStatus::Compressed(report) if report.outcome.budget_met() => tracing::info!(
                job = %job.name,
                quality = report.outcome.quality(),
                size = report.outcome.size(),
                attempts = report.attempts,
                "Compressed within budget"
            ),
            JobStatus::Compressed(report) => tracing::warn!(
                job = %job.name,
                quality = report.outcome.quality(),
                size = report.outcome.size(),
                budget = report.max_size_bytes,
                "Budget not met at lowest quality"
            ),
            JobStatus::Skipped => tracing::info!(job = %job.name, "No source file found"),
            JobStatus::Failed { error } => tracing::error!(job = %job.name, "Failed: {}", error),
        }
        JobRecord {
            name: job.name.clone(),
            status,
        }
    }

    fn execute(&self, job: &JobConfig) -> JobStatus {
        let source = match self.locator.locate(&job.name) {
            Ok(Some(found)) => found,
            Ok(None) => return JobStatus::Skipped,
            Err(e) => {
                return JobStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        tracing::debug!("{}: using {:?} ({} bytes)", job.name, source.path, source.size);

        let compression = CompressionJob::new(
            source.path,
            self.dest_for(job),
            job.max_size_bytes.unwrap_or(self.max_size_bytes),
        )
        .with_ladder(self.ladder);

        match self.recompressor.compress(&compression) {
            Ok(report) => JobStatus::Compressed(report),
            Err(e) => JobStatus::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, RunSummary};
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::path::Path;

    fn config_for(src: &Path, dest: &Path, jobs: Vec<JobConfig>) -> Config {
        let mut config = Config::default();
        config.general.source_dir = src.to_path_buf();
        config.general.dest_dir = dest.to_path_buf();
        config.jobs = jobs;
        config
    }

    fn write_source(dir: &Path, name: &str) {
        let img = RgbaImage::from_fn(40, 40, |x, y| Rgba([(x * 6) as u8, (y * 6) as u8, 90, 200]));
        DynamicImage::ImageRgba8(img).save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_run_isolates_failures() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        write_source(src.path(), "hero_final_1.png");
        std::fs::write(src.path().join("icon_final_1.png"), b"corrupt").unwrap();

        let config = config_for(
            src.path(),
            dest.path(),
            vec![
                JobConfig::new("icon_final", "icon.png"),
                JobConfig::new("splash_final", "splash.png"),
                JobConfig::new("hero_final", "hero.png"),
            ],
        );
        let records = JobRunner::new(&config).unwrap().run_all();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_failure());
        assert!(matches!(records[1].status, JobStatus::Skipped));
        assert!(matches!(records[2].status, JobStatus::Compressed(_)));

        assert!(!dest.path().join("icon.png").exists());
        assert!(!dest.path().join("splash.png").exists());
        assert!(dest.path().join("hero.png").exists());

        let summary = RunSummary::from_records(&records);
        assert_eq!((summary.succeeded, summary.skipped, summary.failed), (1, 1, 1));
    }

    #[test]
    fn test_per_job_budget_override() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_source(src.path(), "og_image_final_1.png");

        let mut job = JobConfig::new("og_image_final", "og-image.png");
        job.max_size_bytes = Some(1);
        let config = config_for(src.path(), dest.path(), vec![job]);

        let records = JobRunner::new(&config).unwrap().run_all();
        match &records[0].status {
            JobStatus::Compressed(report) => {
                assert_eq!(report.max_size_bytes, 1);
                assert!(matches!(report.outcome, Outcome::Exhausted { quality: 15, .. }));
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_retain_jobs() {
        let mut runner = JobRunner::new(&Config::default()).unwrap();
        let unknown = runner.retain_jobs(&["hero_final".into(), "nope".into()]);
        assert_eq!(unknown, ["nope"]);
        assert_eq!(runner.jobs().len(), 1);
        assert_eq!(runner.jobs()[0].target, "hero.png");
    }

    #[test]
    fn test_dest_for_uses_target_name() {
        let config = config_for(Path::new("/src"), Path::new("/public"), vec![]);
        let runner = JobRunner::new(&config).unwrap();
        let job = JobConfig::new("icon_final", "icon.png");
        assert_eq!(runner.dest_for(&job), PathBuf::from("/public/icon.png"));
    }
}
