//! Jaffle - Extract the Jaffle Shop API into a local dataset
//!
//! # Usage
//!
//! ```bash
//! # Load customers, orders and products (default)
//! jaffle
//! jaffle --config configs/jaffle.toml
//!
//! # Inspect what has been loaded so far
//! jaffle show
//! jaffle show --table orders --rows 5
//! ```

mod cmd;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jaffle_config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Jaffle - Extract the Jaffle Shop API into a local dataset
#[derive(Parser, Debug)]
#[command(name = "jaffle")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline once
    Run,

    /// Show loaded tables and load history
    Show(cmd::show::ShowArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Some(Command::Show(args)) => {
            // Show only prints to stdout
            cmd::show::run(&config, args).await?;
            Ok(ExitCode::SUCCESS)
        }
        // No subcommand = run the pipeline (default behavior)
        Some(Command::Run) | None => {
            let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
            init_logging(&log_level, config.log.format)?;
            cmd::run::run(&config).await
        }
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.log.level.as_filter().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    if format.is_json() {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }

    Ok(())
}
