//! Diagnostics configuration
//!
//! Controls where the library's own `tracing` output goes: file opened,
//! rotation completed, backup compressed, write failed. This is separate
//! from the log files the logger writes.

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - very verbose
    Trace,
    /// Debug level - debugging information
    Debug,
    /// Info level - normal operation (default)
    #[default]
    Info,
    /// Warn level - warnings only
    Warn,
    /// Error level - errors only
    Error,
    /// No diagnostics at all
    Off,
}

impl LogLevel {
    /// Directive for an `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Diagnostics destination
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
}

/// Diagnostics configuration
///
/// # Example
///
/// ```toml
/// [diagnostics]
/// level = "warn"
/// format = "console"
/// output = "stderr"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error, off)
    /// Default: info
    pub level: LogLevel,

    /// Output format (console, json)
    /// Default: console
    pub format: LogFormat,

    /// Output destination (stdout, stderr)
    /// Default: stdout
    pub output: LogOutput,
}

/// Crates whose diagnostics follow the configured level
const LUMBER_TARGETS: &[&str] = &["lumber", "lumber_sinks", "lumber_config", "lumber_cli"];

impl LogConfig {
    /// `EnvFilter` directive: the configured level for lumber crates, `warn`
    /// for everything else
    pub fn filter_directive(&self) -> String {
        let level = self.level.as_str();
        let mut directive = String::from(if self.level == LogLevel::Off { "off" } else { "warn" });
        for target in LUMBER_TARGETS {
            directive.push_str(&format!(",{target}={level}"));
        }
        directive
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Console,
            output: LogOutput::Stdout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
        assert_eq!(config.output, LogOutput::Stdout);
    }

    #[test]
    fn test_unknown_output_rejected() {
        assert!(toml::from_str::<LogConfig>("output = \"syslog\"").is_err());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
output = "stderr"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_deserialize_all_levels() {
        for (s, expected) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
            ("off", LogLevel::Off),
        ] {
            let toml = format!("level = \"{}\"", s);
            let config: LogConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.level, expected);
        }
    }

    #[test]
    fn test_filter_directive() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        let directive = config.filter_directive();
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("lumber_sinks=debug"));

        let off = LogConfig {
            level: LogLevel::Off,
            ..LogConfig::default()
        };
        assert!(off.filter_directive().starts_with("off,"));
        assert!(off.filter_directive().contains("lumber=off"));
    }

    #[test]
    fn test_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Off.as_str(), "off");
    }
}
