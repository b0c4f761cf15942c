//! Lumber - leveled file logger
//!
//! # Usage
//!
//! ```bash
//! # Write demo lines with the default configuration (default)
//! lumber
//! lumber --config lumber.toml demo --lines 100 --levels-log
//!
//! # Validate a config file and print the sinks it creates
//! lumber check --config lumber.toml
//! ```

mod cmd;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumber_config::{LogConfig, LogFormat, LogOutput, LoggerConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Lumber - leveled file logger with rotating CSV/JSON sinks
#[derive(Parser, Debug)]
#[command(name = "lumber")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Diagnostics level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write demo lines through every entry point
    Demo(cmd::demo::DemoArgs),

    /// Validate configuration and print the resulting sinks
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Check) => cmd::check::run(&config),
        Some(Command::Demo(args)) => {
            init_logging(&config.diagnostics, cli.log_level.as_deref())?;
            cmd::demo::run(config, args)
        }
        // No subcommand = demo with defaults
        None => {
            init_logging(&config.diagnostics, cli.log_level.as_deref())?;
            cmd::demo::run(config, cmd::demo::DemoArgs::default())
        }
    }
}

/// Config file if given, defaults otherwise
fn load_config(path: Option<&Path>) -> Result<LoggerConfig> {
    match path {
        Some(path) => LoggerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(LoggerConfig::default()),
    }
}

/// Initialize the tracing subscriber for the logger's own diagnostics
///
/// Level: CLI flag > `RUST_LOG` > config file.
fn init_logging(config: &LogConfig, cli_level: Option<&str>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.filter_directive())),
    }
    .or_else(|_| EnvFilter::try_new("info"))
    .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let layer = match (config.format, config.output) {
        (LogFormat::Console, LogOutput::Stdout) => fmt::layer().with_target(true).boxed(),
        (LogFormat::Console, LogOutput::Stderr) => fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        (LogFormat::Json, LogOutput::Stdout) => fmt::layer().json().boxed(),
        (LogFormat::Json, LogOutput::Stderr) => fmt::layer().json().with_writer(io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    Ok(())
}
