//! Logger configuration
//!
//! Everything the logger needs to build its sinks. All fields are optional
//! in TOML; unknown level names fall back to `info` and unknown format names
//! to `json`.

use std::path::PathBuf;

use lumber_encoding::{Level, OutputFormat, TimeEncoder};
use serde::Deserialize;

use crate::logging::LogConfig;

/// Default base path of the general sink
pub const DEFAULT_PATH: &str = "logs/app.log";

/// Default size limit per file in megabytes
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500;

/// Default number of retained backups
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Default backup age limit in days
pub const DEFAULT_MAX_AGE: u32 = 7;

/// Default number of path components in the caller column
pub const DEFAULT_CALLER_DEPTH: usize = 2;

/// Logger configuration
///
/// # Example
///
/// ```toml
/// path = "logs/api.log"
/// level = "debug"
/// request_log = true
/// levels_log = false
/// format = "json"
/// request_format = "csv"
/// max_file_size = 100
/// max_backups = 10
/// max_age = 30
/// compress = true
/// caller = true
///
/// [diagnostics]
/// level = "warn"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Base path; other sinks append a suffix (`.Request`, `.ERROR`, ...)
    pub path: PathBuf,

    /// Minimum level of the general sink
    pub level: Level,

    /// Create the request sink
    pub request_log: bool,

    /// Split events into one sink per level
    pub levels_log: bool,

    /// Format of every sink except the request sink
    pub format: OutputFormat,

    /// Format of the request sink
    pub request_format: OutputFormat,

    /// Size limit per file in megabytes
    pub max_file_size: u64,

    /// Backups to retain per sink (0 keeps all)
    pub max_backups: usize,

    /// Maximum backup age in days (0 disables age pruning)
    pub max_age: u32,

    /// Compress backups with lz4
    pub compress: bool,

    /// Timestamp backup names in local time instead of UTC
    pub local_time: bool,

    /// Write the call site of each event
    pub caller: bool,

    /// Trailing path components of the call site (0 keeps the full path)
    ///
    /// Not a stack frame offset: the call site is always the caller of the
    /// logging entry point.
    pub caller_depth: usize,

    /// Timestamp rendering of each line
    pub time_format: TimeEncoder,

    /// The library's own diagnostics
    pub diagnostics: LogConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            level: Level::Info,
            request_log: false,
            levels_log: false,
            format: OutputFormat::Json,
            request_format: OutputFormat::Csv,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age: DEFAULT_MAX_AGE,
            compress: true,
            local_time: true,
            caller: false,
            caller_depth: DEFAULT_CALLER_DEPTH,
            time_format: TimeEncoder::Iso8601,
            diagnostics: LogConfig::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_request_log(mut self, enabled: bool) -> Self {
        self.request_log = enabled;
        self
    }

    #[must_use]
    pub fn with_levels_log(mut self, enabled: bool) -> Self {
        self.levels_log = enabled;
        self
    }
}
