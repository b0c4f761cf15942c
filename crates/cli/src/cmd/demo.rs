//! Demo command - exercise every entry point and report sink counters

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lumber::{Field, Level, Logger, LoggerConfig, Override, OutputFormat};

const DEFAULT_LINES: usize = 10;

/// Arguments for the demo command
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Lines written per level
    #[arg(short = 'n', long, default_value_t = DEFAULT_LINES)]
    pub lines: usize,

    /// Base log path (overrides config)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Minimum level of the general sink (overrides config)
    #[arg(long)]
    pub level: Option<String>,

    /// Format of every sink except the request sink (json, csv)
    #[arg(long)]
    pub format: Option<String>,

    /// Enable the request sink
    #[arg(long)]
    pub request_log: bool,

    /// Split output into one file per level
    #[arg(long)]
    pub levels_log: bool,

    /// Record the call site of each line
    #[arg(long)]
    pub caller: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            lines: DEFAULT_LINES,
            path: None,
            level: None,
            format: None,
            request_log: false,
            levels_log: false,
            caller: false,
        }
    }
}

impl DemoArgs {
    fn apply(&self, mut config: LoggerConfig) -> LoggerConfig {
        if let Some(path) = &self.path {
            config.path = path.clone();
        }
        if let Some(level) = &self.level {
            config.level = Level::parse_lossy(level);
        }
        if let Some(format) = &self.format {
            config.apply(&[Override::LogFormat(OutputFormat::parse_lossy(format))]);
        }
        if self.caller {
            config.apply(&[Override::Caller(true)]);
        }
        config.request_log |= self.request_log;
        config.levels_log |= self.levels_log;
        config
    }
}

/// Run the demo command
pub fn run(config: LoggerConfig, args: DemoArgs) -> Result<()> {
    let config = args.apply(config);
    let logger = Logger::init(config).context("failed to initialize logger")?;

    let session = logger.with(&[Field::new("session", "demo")]);

    for i in 0..args.lines {
        session.debug("cache lookup", &[Field::new("key", format!("user:{i}"))]);
        session.info("request served", &[Field::new("seq", i), Field::new("latency_ms", 1.5 * i as f64)]);
        lumber::warn!(session, "queue depth {} above threshold", 100 + i);
        lumber::error!(session, "upstream failed"; attempt = i, retryable = i % 2 == 0);
        lumber::request!(session, "GET /users"; status = 200u16, bytes = 512u64 * i as u64);
    }
    session.info(
        "awkward values",
        &[
            Field::new("quote", "he said, \"hi\"\n"),
            Field::complex128("impedance", 1.5, -2.0),
            Field::new("tags", vec!["a", "b"]),
        ],
    );

    logger.sync().context("failed to flush log files")?;
    tracing::info!(lines = args.lines, sinks = logger.sinks().len(), "demo lines written");

    for (file_type, metrics) in logger.metrics() {
        let path = logger
            .sink(file_type)
            .map(|sink| sink.path().display().to_string())
            .unwrap_or_default();
        println!(
            "{file_type:<8} {path}: {} lines, {} bytes, {} errors",
            metrics.lines_written, metrics.bytes_written, metrics.write_errors
        );
    }

    logger.close().context("failed to close log files")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_args_override_config() {
        let args = DemoArgs {
            path: Some(PathBuf::from("var/demo.log")),
            level: Some("debug".into()),
            format: Some("csv".into()),
            request_log: true,
            caller: true,
            ..DemoArgs::default()
        };

        let config = args.apply(LoggerConfig::default());
        assert_eq!(config.path, PathBuf::from("var/demo.log"));
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.request_format, OutputFormat::Csv);
        assert!(config.request_log);
        assert!(!config.levels_log);
        assert!(config.caller);
    }

    #[test]
    fn test_flags_do_not_disable_config() {
        let config = LoggerConfig::default().with_levels_log(true);
        let config = DemoArgs::default().apply(config);
        assert!(config.levels_log);
    }

    #[test]
    fn test_run_writes_files() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig::new(dir.path().join("demo.log"));
        let args = DemoArgs {
            lines: 3,
            request_log: true,
            levels_log: true,
            ..DemoArgs::default()
        };

        run(config, args).unwrap();

        assert!(dir.path().join("demo.log.Request.csv").exists());
        assert!(dir.path().join("demo.log.ERROR").exists());
        assert!(dir.path().join("demo.log.WARN").exists());
        assert!(!dir.path().join("demo.log").exists());
    }
}
