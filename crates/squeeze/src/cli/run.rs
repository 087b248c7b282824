//! The `squeeze run` command: every configured job, one at a time.

use clap::{Args, ValueEnum};
use squeeze_core::config::WriteMode;
use squeeze_core::{
    Config, JobRecord, JobRunner, JobStatus, OutputFormat as CoreOutputFormat, ReportWriter,
    RunSummary,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Report formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    /// One JSON document with all jobs and a summary
    Json,
    /// One JSON object per job (newline-delimited)
    Jsonl,
}

impl From<ReportFormat> for CoreOutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => CoreOutputFormat::Json,
            ReportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory to search for source images
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Directory to write recompressed images to
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Size budget in bytes for jobs without their own override
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_size: Option<u64>,

    /// Run only the named job (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Keep attempts in memory and write only the final image
    #[arg(long)]
    pub buffered: bool,

    /// Emit a machine-readable report; without a value, `[output] format` is used
    #[arg(long, value_enum, num_args = 0..=1, value_name = "FORMAT")]
    pub report: Option<Option<ReportFormat>>,

    /// Write the report here instead of stdout
    #[arg(long, requires = "report")]
    pub report_file: Option<PathBuf>,
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(config: &mut Config, args: &RunArgs) -> anyhow::Result<()> {
    if let Some(dir) = &args.source_dir {
        config.general.source_dir = dir.clone();
    }
    if let Some(dir) = &args.dest_dir {
        config.general.dest_dir = dir.clone();
    }
    if let Some(bytes) = args.max_size {
        config.compression.max_size_bytes = bytes;
    }
    if args.buffered {
        config.compression.write_mode = WriteMode::Buffered;
    }
    config.validate()?;
    Ok(())
}

/// Resolve the report format: the `--report` value if one was given,
/// otherwise the configured default.
fn report_format(args: &RunArgs, config: &Config) -> anyhow::Result<Option<CoreOutputFormat>> {
    match args.report {
        None => Ok(None),
        Some(Some(format)) => Ok(Some(format.into())),
        Some(None) => CoreOutputFormat::parse(&config.output.format)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Unknown output.format {:?}", config.output.format)),
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args)?;

    let mut runner = JobRunner::new(&config)?;
    if !args.only.is_empty() {
        let unknown = runner.retain_jobs(&args.only);
        if !unknown.is_empty() {
            anyhow::bail!("Unknown job(s): {}", unknown.join(", "));
        }
    }
    if runner.jobs().is_empty() {
        tracing::warn!("No jobs configured");
        return Ok(());
    }

    tracing::info!(
        "Running {} job(s): {:?} -> {:?}",
        runner.jobs().len(),
        config.source_dir(),
        config.dest_dir()
    );

    // A report on stdout would interleave with the result lines, so those
    // move to stderr in that case.
    let format = report_format(&args, &config)?;
    let report_on_stdout = format.is_some() && args.report_file.is_none();
    let mut report = match format {
        Some(format) => {
            let sink: Box<dyn Write> = match &args.report_file {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(std::io::stdout()),
            };
            Some(ReportWriter::new(sink, format, config.output.pretty))
        }
        None => None,
    };

    let runner = Arc::new(runner);
    let start = std::time::Instant::now();
    let mut records = Vec::with_capacity(runner.jobs().len());

    for job in runner.jobs().to_vec() {
        let worker = Arc::clone(&runner);
        let name = job.name.clone();
        let record = match tokio::task::spawn_blocking(move || worker.run_job(&job)).await {
            Ok(record) => record,
            Err(e) => JobRecord {
                name,
                status: JobStatus::Failed {
                    error: format!("worker task failed: {e}"),
                },
            },
        };

        if report_on_stdout {
            eprintln!("{record}");
        } else {
            println!("{record}");
        }
        if let Some(writer) = &mut report {
            writer.record(&record)?;
        }
        records.push(record);
    }

    if let Some(writer) = report {
        writer.finish()?;
        if let Some(path) = &args.report_file {
            tracing::info!("Report written to {:?}", path);
        }
    }

    let summary = RunSummary::from_records(&records);
    tracing::info!(
        "Done in {:.1}s: {} within budget, {} over budget, {} skipped, {} failed",
        start.elapsed().as_secs_f64(),
        summary.succeeded,
        summary.over_budget,
        summary.skipped,
        summary.failed
    );

    if summary.failed > 0 {
        anyhow::bail!("{} job(s) failed", summary.failed);
    }
    Ok(())
}
