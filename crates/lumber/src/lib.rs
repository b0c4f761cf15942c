//! Lumber - leveled file logging with rotating CSV/JSON sinks
//!
//! A [`Logger`] routes each event to one sink by level: the general sink at
//! the configured path, an optional request sink (`<path>.Request`) and,
//! when `levels_log` is set, one sink per level (`<path>.DEBUG` through
//! `<path>.ERROR`; panic and fatal share the error sink). Each sink encodes
//! with its own format and rotates its file by size, keeping a bounded set
//! of lz4-compressed backups.
//!
//! # Example
//!
//! ```no_run
//! use lumber::{Field, Level, Logger, LoggerConfig, Override};
//!
//! let config = LoggerConfig::new("logs/api.log")
//!     .with_level(Level::Debug)
//!     .with_request_log(true)
//!     .with_overrides([Override::Caller(true), Override::MaxFileSize(100)]);
//! let logger = Logger::init(config)?;
//!
//! logger.info("started", &[Field::new("version", "1.4.2")]);
//! lumber::request!(logger, "GET /users"; status = 200u16, latency_ms = 3.2f64);
//!
//! let scoped = logger.with(&[Field::new("tenant", "acme")]);
//! lumber::debug!(scoped, "cache miss for {}", "user:42");
//!
//! logger.sync()?;
//! # Ok::<(), lumber::LumberError>(())
//! ```

mod builder;
mod error;
mod logger;
mod macros;

pub use builder::{sink_path, sink_settings};
pub use error::{LumberError, Result};
pub use logger::Logger;

pub use lumber_config::{LogConfig, LoggerConfig, Override};
pub use lumber_encoding::{Caller, Field, FieldValue, Level, LogEvent, OutputFormat, TimeEncoder};
pub use lumber_routing::{FileType, RoutingTable, SinkId};
pub use lumber_sinks::{MetricsSnapshot, Sink, SinkSettings};
