//! Log severity levels
//!
//! Levels are totally ordered: `Debug < Info < Warn < Error < Panic < Fatal`.
//! A sink accepts an event when the event level is at or above its threshold.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EncodingError;

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
#[serde(from = "String")]
#[repr(u8)]
pub enum Level {
    /// Debugging information
    Debug = 0,
    /// Normal operation (default)
    #[default]
    Info = 1,
    /// Something unexpected, operation continues
    Warn = 2,
    /// Operation failed
    Error = 3,
    /// Severe failure; logged only, never unwinds the caller
    Panic = 4,
    /// Unrecoverable failure; logged only, never exits the process
    Fatal = 5,
}

impl Level {
    /// All levels in ascending severity
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Panic,
        Level::Fatal,
    ];

    /// Lowercase name (`"info"`)
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Uppercase name (`"INFO"`)
    #[inline]
    pub const fn as_capital_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }

    /// Convert to u8 tag
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create from u8 tag (None for values outside the level range)
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Debug),
            1 => Some(Self::Info),
            2 => Some(Self::Warn),
            3 => Some(Self::Error),
            4 => Some(Self::Panic),
            5 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parse a level name, falling back to `Info` for unknown names
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Whether an event at `self` passes a sink whose threshold is `threshold`
    #[inline]
    pub fn enabled_at(self, threshold: Level) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            _ => Err(EncodingError::unknown_level(s)),
        }
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Self::parse_lossy(&name)
    }
}
