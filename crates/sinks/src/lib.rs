//! Lumber sinks - rotating log files and the sinks that encode into them
//!
//! A logger owns one [`Sink`] per active file type. Each sink encodes events
//! with its own CSV or JSON encoder and appends the lines to a
//! [`RollingFile`], which rotates by size and keeps a bounded set of
//! (optionally lz4-compressed) backups.
//!
//! ```text
//! [LogEvent] -> [Sink: threshold, encode] -> [Mutex<RollingFile>] -> logs/app.log
//!                                                   | (full)
//!                                                   v
//!                                  logs/app-2025-01-15T10-30-45.123.log.lz4
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lumber_encoding::{EncoderPool, Level, LogEvent};
//! use lumber_routing::FileType;
//! use lumber_sinks::{Sink, SinkSettings};
//!
//! let sink = Sink::new(
//!     FileType::General,
//!     SinkSettings::new("logs/app.log"),
//!     Arc::new(EncoderPool::default()),
//! );
//! sink.write(&LogEvent::new(Level::Info, "started"))?;
//! sink.sync()?;
//! # Ok::<(), lumber_sinks::SinkError>(())
//! ```

pub mod common;
pub mod rotation;
pub mod sink;
pub mod util;

pub use common::{MetricsSnapshot, Result, SinkError, SinkMetrics};
pub use rotation::{Backup, BackupName, RollingFile, RotationConfig};
pub use sink::{Sink, SinkSettings, ensure_csv_suffix};
pub use util::RateLimitedLogger;
