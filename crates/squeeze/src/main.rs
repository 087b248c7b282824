//! squeeze CLI - recompress images until they fit under a file-size budget.
//!
//! # Usage
//!
//! ```bash
//! # Run the configured jobs (newest `<name>_*.png` per job -> fixed names)
//! squeeze run --source-dir ./generated --dest-dir ./public
//!
//! # Compress one file
//! squeeze compress hero_final_1712.png public/hero.png --max-size 256000
//!
//! # View configuration
//! squeeze config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// squeeze - recompress images until they fit under a file-size budget.
#[derive(Parser, Debug)]
#[command(name = "squeeze")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "SQUEEZE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate and recompress every configured job
    Run(cli::run::RunArgs),

    /// Recompress a single image
    Compress(cli::compress::CompressArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => squeeze_core::Config::load_from(path)?,
        None => match squeeze_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `squeeze config path`."
                );
                squeeze_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("squeeze v{}", squeeze_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Compress(args) => cli::compress::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::cli::run::ReportFormat;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "squeeze",
            "-v",
            "run",
            "--source-dir",
            "in",
            "--only",
            "hero_final",
            "--only",
            "icon_final",
            "--max-size",
            "1000",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.only, ["hero_final", "icon_final"]);
                assert_eq!(args.max_size, Some(1000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bare_report_flag() {
        let cli =
            Cli::try_parse_from(["squeeze", "run", "--report", "--report-file", "out.json"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert!(matches!(args.report, Some(None)));
                assert_eq!(args.report_file, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["squeeze", "run", "--report", "jsonl"]).unwrap();
        match cli.command {
            Commands::Run(args) => assert!(matches!(args.report, Some(Some(ReportFormat::Jsonl)))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_budget() {
        let result = Cli::try_parse_from(["squeeze", "compress", "a.png", "b.png", "--max-size", "0"]);
        assert!(result.is_err());
    }
}
