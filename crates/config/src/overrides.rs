//! Logger overrides
//!
//! Each [`Override`] replaces one setting. A list is applied in order, so
//! the last override of a setting wins. `LogFormat` targets every sink
//! except the request sink and `RequestFormat` only the request sink; the
//! rest apply to every sink.
//!
//! ```
//! use lumber_config::{LoggerConfig, Override};
//! use lumber_encoding::OutputFormat;
//!
//! let config = LoggerConfig::default().with_overrides([
//!     Override::LogFormat(OutputFormat::Csv),
//!     Override::MaxBackups(10),
//! ]);
//! assert_eq!(config.format, OutputFormat::Csv);
//! assert_eq!(config.request_format, OutputFormat::Csv);
//! assert_eq!(config.max_backups, 10);
//! ```

use lumber_encoding::OutputFormat;

use crate::logger::LoggerConfig;

/// One setting replaced at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// Format of every sink except the request sink
    LogFormat(OutputFormat),
    /// Format of the request sink
    RequestFormat(OutputFormat),
    /// Size limit per file in megabytes
    MaxFileSize(u64),
    MaxBackups(usize),
    /// Maximum backup age in days
    MaxAge(u32),
    Compress(bool),
    Caller(bool),
    CallerDepth(usize),
    LocalTime(bool),
}

impl Override {
    pub fn apply(self, config: &mut LoggerConfig) {
        match self {
            Self::LogFormat(format) => config.format = format,
            Self::RequestFormat(format) => config.request_format = format,
            Self::MaxFileSize(megabytes) => config.max_file_size = megabytes,
            Self::MaxBackups(count) => config.max_backups = count,
            Self::MaxAge(days) => config.max_age = days,
            Self::Compress(compress) => config.compress = compress,
            Self::Caller(caller) => config.caller = caller,
            Self::CallerDepth(depth) => config.caller_depth = depth,
            Self::LocalTime(local) => config.local_time = local,
        }
    }
}

impl LoggerConfig {
    /// Apply overrides in order
    pub fn apply(&mut self, overrides: &[Override]) {
        for o in overrides {
            o.apply(self);
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = Override>) -> Self {
        for o in overrides {
            o.apply(&mut self);
        }
        self
    }
}
