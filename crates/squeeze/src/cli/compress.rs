//! The `squeeze compress` command: one source, one destination, one budget.

use clap::Args;
use squeeze_core::config::WriteMode;
use squeeze_core::{CompressionJob, Config, QualityLadder, Recompressor};
use std::path::PathBuf;

/// Arguments for the `compress` command.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Image to recompress
    pub source: PathBuf,

    /// Output path; always receives JPEG data whatever its extension
    pub dest: PathBuf,

    /// Size budget in bytes (defaults to compression.max_size_bytes)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_size: Option<u64>,

    /// First quality tried
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub start_quality: Option<u8>,

    /// Quality decrease per attempt
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub step: Option<u8>,

    /// Exclusive quality floor
    #[arg(long)]
    pub min_quality: Option<u8>,

    /// Keep attempts in memory and write only the final image
    #[arg(long)]
    pub buffered: bool,

    /// Print the report as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,
}

impl CompressArgs {
    fn job(&self, config: &Config) -> anyhow::Result<CompressionJob> {
        let c = &config.compression;
        let start = self.start_quality.unwrap_or(c.start_quality);
        let floor = self.min_quality.unwrap_or(c.min_quality);
        if floor >= start {
            anyhow::bail!("--min-quality ({floor}) must be below the start quality ({start})");
        }
        let ladder = QualityLadder::new(start, self.step.unwrap_or(c.quality_step), floor);

        Ok(CompressionJob::new(
            self.source.clone(),
            self.dest.clone(),
            self.max_size.unwrap_or(c.max_size_bytes),
        )
        .with_ladder(ladder))
    }
}

/// Execute the compress command.
pub async fn execute(args: CompressArgs, mut config: Config) -> anyhow::Result<()> {
    if args.buffered {
        config.compression.write_mode = WriteMode::Buffered;
    }
    let job = args.job(&config)?;
    let recompressor = Recompressor::from_config(&config.compression)?;

    tracing::info!(
        "Compressing {:?} -> {:?} (budget {} bytes)",
        job.source,
        job.dest,
        job.max_size_bytes
    );
    let report = tokio::task::spawn_blocking(move || recompressor.compress(&job)).await??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CompressArgs {
        CompressArgs {
            source: PathBuf::from("in.png"),
            dest: PathBuf::from("out.png"),
            max_size: None,
            start_quality: None,
            step: None,
            min_quality: None,
            buffered: false,
            json: false,
        }
    }

    #[test]
    fn test_job_uses_config_defaults() {
        let job = args().job(&Config::default()).unwrap();
        assert_eq!(job.max_size_bytes, 256_000);
        assert_eq!(job.ladder, QualityLadder::new(95, 5, 10));
    }

    #[test]
    fn test_job_flag_overrides() {
        let mut a = args();
        a.max_size = Some(10);
        a.start_quality = Some(80);
        a.step = Some(10);
        a.min_quality = Some(20);
        let job = a.job(&Config::default()).unwrap();
        assert_eq!(job.max_size_bytes, 10);
        assert_eq!(job.ladder.levels().collect::<Vec<_>>(), [80, 70, 60, 50, 40, 30]);
    }

    #[test]
    fn test_job_rejects_floor_above_start() {
        let mut a = args();
        a.start_quality = Some(30);
        a.min_quality = Some(30);
        assert!(a.job(&Config::default()).is_err());
    }

    #[tokio::test]
    async fn test_execute_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args();
        a.source = dir.path().join("missing.png");
        a.dest = dir.path().join("out.png");
        let err = execute(a, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!dir.path().join("out.png").exists());
    }
}
