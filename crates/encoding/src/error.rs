//! Encoding error types
//!
//! Encoding a line never fails. These errors only come from parsing names
//! (levels, output formats) out of configuration.

use thiserror::Error;

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, EncodingError>;

/// Errors from parsing encoding-related names
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Level name not recognized
    #[error("unknown log level '{name}'")]
    UnknownLevel {
        /// The rejected name
        name: String,
    },

    /// Output format name not recognized
    #[error("unknown output format '{name}' (expected json or csv)")]
    UnknownFormat {
        /// The rejected name
        name: String,
    },

    /// Time encoder name not recognized
    #[error("unknown time encoder '{name}'")]
    UnknownTimeEncoder {
        /// The rejected name
        name: String,
    },
}

impl EncodingError {
    /// Create an UnknownLevel error
    #[inline]
    pub fn unknown_level(name: impl Into<String>) -> Self {
        Self::UnknownLevel { name: name.into() }
    }

    /// Create an UnknownFormat error
    #[inline]
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat { name: name.into() }
    }

    /// Create an UnknownTimeEncoder error
    #[inline]
    pub fn unknown_time_encoder(name: impl Into<String>) -> Self {
        Self::UnknownTimeEncoder { name: name.into() }
    }
}
