//! Command-line interface for webload-ci.
//!
//! # Commands
//!
//! - `session` - run a load session template with the console
//! - `report` - publish an analytics report, optionally comparing builds
//! - `config` - manage the global configuration
//! - `portfolios` - list the known report portfolios
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - alternative global configuration file
//!
//! `RUST_LOG`, when set, takes precedence over both logging flags.
//!
//! # Exit Codes
//!
//! | Outcome | Exit code |
//! |---------|-----------|
//! | success | 0 |
//! | unstable | `--unstable-exit-code` (0 unless set) |
//! | failure or error | 1 |

pub mod common;
mod config;
mod portfolios;
mod report;
mod session;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global options before a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Alternative global configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// The log filter: `RUST_LOG` when set, otherwise [`log_level`](Self::log_level).
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        match std::env::var("RUST_LOG") {
            Ok(value) if !value.is_empty() => EnvFilter::new(value),
            _ => EnvFilter::new(&self.log_level),
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "webload-ci",
    about = "Run WebLOAD load sessions and publish Analytics reports from CI jobs",
    version,
    long_about = "webload-ci drives the WebLOAD console and WebLOAD Analytics from a CI build step. \
                  It resolves the installation, runs the tool, interprets its results and archives \
                  the session files for comparison by later builds."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the global configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a load session template with the WebLOAD console
    Session(session::SessionCommand),

    /// Publish a WebLOAD Analytics report
    Report(report::ReportCommand),

    /// Manage the global configuration
    Config(config::ConfigCommand),

    /// List the portfolios WebLOAD Analytics ships with
    Portfolios(portfolios::PortfoliosCommand),
}

impl Cli {
    /// Set up logging and run the selected command, returning the exit code.
    pub async fn execute(self) -> Result<i32> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Derive the [`CliConfig`] from the global options.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with an already built configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<i32> {
        match self.command {
            Commands::Session(cmd) => cmd.execute(config.config_path).await,
            Commands::Report(cmd) => cmd.execute(config.config_path).await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
            Commands::Portfolios(cmd) => cmd.execute(),
        }
    }
}
