//! Encoder configuration
//!
//! An [`EncoderConfig`] is built once per sink and shared read-only (behind an
//! `Arc`) by every encoder instance checked out for that sink.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Deserialize;

use crate::append::{ValueEncoder, unix_nanos};
use crate::error::EncodingError;
use crate::level::Level;

/// Default number of trailing path components rendered for the caller
pub const DEFAULT_CALLER_DEPTH: usize = 2;

/// Callback form of a time encoder
pub type TimeEncoderFn = fn(DateTime<Utc>, &mut dyn ValueEncoder);

/// Callback form of a level encoder
pub type LevelEncoderFn = fn(Level, &mut dyn ValueEncoder);

/// How timestamps are rendered
///
/// An encoder that appends nothing (`Omit`, or a custom callback that writes
/// nothing) makes the line encoder fall back to nanoseconds since the epoch,
/// so every timestamp stays representable.
#[derive(Clone, Copy, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeEncoder {
    /// `2025-01-15T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `2025-01-15T11:30:45.123+01:00`, in the host's time zone
    Iso8601Local,
    /// `2025-01-15T10:30:45Z`
    Rfc3339,
    /// `2025-01-15T10:30:45.123456789Z`
    Rfc3339Nano,
    /// Float seconds since the epoch
    EpochSeconds,
    /// Float milliseconds since the epoch
    EpochMillis,
    /// Integer nanoseconds since the epoch
    EpochNanos,
    /// Writes nothing
    Omit,
    Custom(TimeEncoderFn),
}

impl TimeEncoder {
    /// Append `t` to `enc`
    pub fn encode(&self, t: DateTime<Utc>, enc: &mut dyn ValueEncoder) {
        match self {
            Self::Iso8601 => enc.append_str(&t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            Self::Iso8601Local => enc.append_str(
                &t.with_timezone(&Local)
                    .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
                    .to_string(),
            ),
            Self::Rfc3339 => enc.append_str(&t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::Rfc3339Nano => enc.append_str(&t.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            Self::EpochSeconds => enc.append_f64(unix_nanos(t) as f64 / 1e9),
            Self::EpochMillis => enc.append_f64(unix_nanos(t) as f64 / 1e6),
            Self::EpochNanos => enc.append_i64(unix_nanos(t)),
            Self::Omit => {}
            Self::Custom(f) => f(t, enc),
        }
    }

    /// Configuration name of this encoder
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Iso8601Local => "iso8601local",
            Self::Rfc3339 => "rfc3339",
            Self::Rfc3339Nano => "rfc3339nano",
            Self::EpochSeconds => "epoch",
            Self::EpochMillis => "millis",
            Self::EpochNanos => "nanos",
            Self::Omit => "omit",
            Self::Custom(_) => "custom",
        }
    }
}

impl FromStr for TimeEncoder {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso8601" | "iso" => Ok(Self::Iso8601),
            "iso8601local" | "local" => Ok(Self::Iso8601Local),
            "rfc3339" => Ok(Self::Rfc3339),
            "rfc3339nano" => Ok(Self::Rfc3339Nano),
            "epoch" | "seconds" => Ok(Self::EpochSeconds),
            "millis" => Ok(Self::EpochMillis),
            "nanos" => Ok(Self::EpochNanos),
            "omit" | "none" => Ok(Self::Omit),
            _ => Err(EncodingError::unknown_time_encoder(s)),
        }
    }
}

impl TryFrom<String> for TimeEncoder {
    type Error = EncodingError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Debug for TimeEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeEncoder({})", self.name())
    }
}

/// How levels are rendered
///
/// An encoder that appends nothing falls back to the lowercase level name.
#[derive(Clone, Copy, Default)]
pub enum LevelEncoder {
    /// `info`
    #[default]
    Lowercase,
    /// `INFO`
    Capital,
    /// Writes nothing
    Omit,
    Custom(LevelEncoderFn),
}

impl LevelEncoder {
    /// Append `level` to `enc`
    pub fn encode(&self, level: Level, enc: &mut dyn ValueEncoder) {
        match self {
            Self::Lowercase => enc.append_str(level.as_str()),
            Self::Capital => enc.append_str(level.as_capital_str()),
            Self::Omit => {}
            Self::Custom(f) => f(level, enc),
        }
    }
}

impl fmt::Debug for LevelEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lowercase => "lowercase",
            Self::Capital => "capital",
            Self::Omit => "omit",
            Self::Custom(_) => "custom",
        };
        write!(f, "LevelEncoder({name})")
    }
}

/// Keys and formatting callbacks for one sink's encoder
///
/// An empty key drops that column from the CSV line and that key from the
/// JSON object.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub level_key: String,
    pub time_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub encode_time: TimeEncoder,
    pub encode_level: LevelEncoder,
    /// Trailing path components kept in the caller column (`0` keeps all)
    pub caller_depth: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl EncoderConfig {
    /// Production keys (`level`, `ts`, `caller`, `msg`, `stacktrace`) with ISO8601 time
    pub fn production() -> Self {
        Self {
            level_key: "level".into(),
            time_key: "ts".into(),
            caller_key: "caller".into(),
            message_key: "msg".into(),
            stacktrace_key: "stacktrace".into(),
            line_ending: "\n".into(),
            encode_time: TimeEncoder::Iso8601,
            encode_level: LevelEncoder::Lowercase,
            caller_depth: DEFAULT_CALLER_DEPTH,
        }
    }

    #[must_use]
    pub fn with_time_encoder(mut self, encoder: TimeEncoder) -> Self {
        self.encode_time = encoder;
        self
    }

    #[must_use]
    pub fn with_caller_depth(mut self, depth: usize) -> Self {
        self.caller_depth = depth;
        self
    }

    #[must_use]
    pub fn with_level_encoder(mut self, encoder: LevelEncoder) -> Self {
        self.encode_level = encoder;
        self
    }
}
