//! Lumber Configuration
//!
//! TOML-based logger configuration with sensible defaults.
//! An empty config just works - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use lumber_config::LoggerConfig;
//! use std::str::FromStr;
//!
//! let config = LoggerConfig::from_str("path = \"logs/api.log\"\nrequest_log = true").unwrap();
//! assert!(config.request_log);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! path = "logs/api.log"
//! level = "debug"
//! levels_log = true
//! format = "csv"
//!
//! [diagnostics]
//! level = "warn"
//! output = "stderr"
//! ```

mod error;
mod logger;
mod logging;
mod overrides;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logger::{
    DEFAULT_CALLER_DEPTH, DEFAULT_MAX_AGE, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_PATH, LoggerConfig,
};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use overrides::Override;

impl LoggerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::io(path.display().to_string(), e))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: LoggerConfig = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for an empty path and a zero file size limit.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for LoggerConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumber_encoding::{Level, OutputFormat, TimeEncoder};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LoggerConfig::from_str("").unwrap();

        assert_eq!(config.path, PathBuf::from("logs/app.log"));
        assert_eq!(config.level, Level::Info);
        assert!(!config.request_log);
        assert!(!config.levels_log);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.request_format, OutputFormat::Csv);
        assert_eq!(config.max_file_size, 500);
        assert_eq!(config.max_backups, 5);
        assert_eq!(config.max_age, 7);
        assert!(config.compress);
        assert!(config.local_time);
        assert!(!config.caller);
        assert_eq!(config.caller_depth, 2);
        assert!(matches!(config.time_format, TimeEncoder::Iso8601));
        assert_eq!(config.diagnostics.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
path = "var/api.log"
level = "debug"
request_log = true
levels_log = true
format = "csv"
request_format = "json"
max_file_size = 100
max_backups = 10
max_age = 30
compress = false
local_time = false
caller = true
caller_depth = 3
time_format = "nanos"

[diagnostics]
level = "warn"
format = "json"
output = "stderr"
"#;
        let config = LoggerConfig::from_str(toml).unwrap();

        assert_eq!(config.path, PathBuf::from("var/api.log"));
        assert_eq!(config.level, Level::Debug);
        assert!(config.request_log);
        assert!(config.levels_log);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.request_format, OutputFormat::Json);
        assert_eq!(config.max_file_size, 100);
        assert_eq!(config.max_backups, 10);
        assert_eq!(config.max_age, 30);
        assert!(!config.compress);
        assert!(!config.local_time);
        assert!(config.caller);
        assert_eq!(config.caller_depth, 3);
        assert!(matches!(config.time_format, TimeEncoder::EpochNanos));
        assert_eq!(config.diagnostics.level, LogLevel::Warn);
        assert_eq!(config.diagnostics.format, LogFormat::Json);
        assert_eq!(config.diagnostics.output, LogOutput::Stderr);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let config = LoggerConfig::from_str("level = \"verbose\"\nformat = \"xml\"").unwrap();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_time_format_rejected() {
        assert!(LoggerConfig::from_str("time_format = \"julian\"").is_err());
    }

    #[test]
    fn test_validation_runs_on_parse() {
        let err = LoggerConfig::from_str("max_file_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = LoggerConfig::from_str("path = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "path", .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let result = LoggerConfig::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_log = true").unwrap();

        let config = LoggerConfig::from_file(file.path()).unwrap();
        assert!(config.request_log);
    }

    #[test]
    fn test_from_missing_file() {
        let err = LoggerConfig::from_file("/nonexistent/lumber.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/lumber.toml"));
    }
}
