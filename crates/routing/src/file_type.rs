//! Sink kinds
//!
//! Each sink a logger may create has a fixed file type with a stable index,
//! a path suffix and a threshold rule.

use std::fmt;
use std::str::FromStr;

use lumber_encoding::Level;

use crate::error::RoutingError;

/// Kind of sink, indexed by a stable small integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FileType {
    /// Catch-all sink at the base path
    General = 0,
    /// Request stream
    Request = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    /// Also receives panic and fatal events
    Error = 5,
}

impl FileType {
    /// Number of file types
    pub const COUNT: usize = 6;

    /// All file types in index order
    pub const ALL: [FileType; Self::COUNT] = [
        FileType::General,
        FileType::Request,
        FileType::Debug,
        FileType::Info,
        FileType::Warn,
        FileType::Error,
    ];

    /// Per-level file types in index order
    pub const LEVELS: [FileType; 4] = [
        FileType::Debug,
        FileType::Info,
        FileType::Warn,
        FileType::Error,
    ];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::General),
            1 => Some(Self::Request),
            2 => Some(Self::Debug),
            3 => Some(Self::Info),
            4 => Some(Self::Warn),
            5 => Some(Self::Error),
            _ => None,
        }
    }

    /// Per-level file type for `level`; panic and fatal share the error file
    #[inline]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Self::Debug,
            Level::Info => Self::Info,
            Level::Warn => Self::Warn,
            Level::Error | Level::Panic | Level::Fatal => Self::Error,
        }
    }

    /// Suffix appended to the base path (none for the general sink)
    pub const fn path_suffix(self) -> &'static str {
        match self {
            Self::General => "",
            Self::Request => ".Request",
            Self::Debug => ".DEBUG",
            Self::Info => ".INFO",
            Self::Warn => ".WARN",
            Self::Error => ".ERROR",
        }
    }

    /// Minimum level this sink accepts
    ///
    /// The general sink uses the configured level, the request sink is fixed
    /// at info and each per-level sink uses its own level.
    pub const fn threshold(self, configured: Level) -> Level {
        match self {
            Self::General => configured,
            Self::Request | Self::Info => Level::Info,
            Self::Debug => Level::Debug,
            Self::Warn => Level::Warn,
            Self::Error => Level::Error,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Request => "request",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u8> for FileType {
    type Error = RoutingError;

    fn try_from(index: u8) -> Result<Self, RoutingError> {
        Self::from_index(index).ok_or_else(|| RoutingError::unknown_file_type(index))
    }
}

impl FromStr for FileType {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ft| ft.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RoutingError::unknown_file_type_name(s))
    }
}
