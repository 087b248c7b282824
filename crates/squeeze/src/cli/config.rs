//! The `squeeze config` command for configuration management.

use clap::{Args, Subcommand};
use squeeze_core::Config;
use std::path::PathBuf;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
///
/// `explicit_path` is the `--config` flag, which takes precedence over the
/// default location for `path` and `init`.
pub async fn execute(
    args: ConfigArgs,
    config: Config,
    explicit_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = explicit_path.unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&path, Config::default().to_toml()?)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        execute(args, Config::default(), Some(path.clone()))
            .await
            .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.jobs.len(), 6);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        let err = execute(args, Config::default(), Some(path.clone()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let args = ConfigArgs {
            command: ConfigCommand::Init { force: true },
        };
        execute(args, Config::default(), Some(path.clone()))
            .await
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[compression]"));
    }
}
