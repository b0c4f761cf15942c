//! Logger handle
//!
//! [`Logger::init`] builds the routing table and one sink per registered
//! file type. The handle is cheap to clone and is passed to whatever needs
//! to log; there is no global logger.
//!
//! Every level has a plain entry point taking a message and fields, and the
//! macros in this crate add a `format_args!` form:
//!
//! ```no_run
//! use lumber::{Field, Logger, LoggerConfig};
//!
//! let logger = Logger::init(LoggerConfig::new("logs/app.log"))?;
//! logger.info("listening", &[Field::new("port", 8080u16)]);
//! lumber::warn!(logger, "queue at {}%", 93);
//! logger.sync()?;
//! # Ok::<(), lumber::LumberError>(())
//! ```

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use lumber_config::LoggerConfig;
use lumber_encoding::{Caller, EncoderPool, Field, Level, LogEvent};
use lumber_routing::{FileType, RoutingOptions, RoutingTable, SinkId};
use lumber_sinks::{MetricsSnapshot, Sink};

use crate::builder::sink_settings;
use crate::error::{LumberError, Result};

/// Leveled logger writing to rotating sinks
#[derive(Debug, Clone)]
pub struct Logger {
    routing: Arc<RoutingTable>,
    /// Indexed by [`SinkId`]
    sinks: Vec<Sink>,
    caller: bool,
}

impl Logger {
    /// Validate `config` and build the sinks it calls for
    ///
    /// Files are created lazily on their first line.
    pub fn init(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let routing = RoutingTable::new(RoutingOptions {
            request_log: config.request_log,
            levels_log: config.levels_log,
        });
        let pool = Arc::new(EncoderPool::default());

        let sinks = routing
            .file_types()
            .iter()
            .map(|&file_type| {
                Sink::new(
                    file_type,
                    sink_settings(&config, file_type),
                    Arc::clone(&pool),
                )
            })
            .collect::<Vec<_>>();

        tracing::info!(
            path = %config.path.display(),
            level = %config.level,
            sinks = sinks.len(),
            request_log = config.request_log,
            levels_log = config.levels_log,
            "logger initialized"
        );

        Ok(Self {
            routing: Arc::new(routing),
            sinks,
            caller: config.caller,
        })
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Log at panic level; does not panic
    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) {
        self.log(Level::Panic, message, fields);
    }

    /// Log at fatal level; does not exit
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) {
        self.log(Level::Fatal, message, fields);
    }

    /// Route and write one event
    ///
    /// Panic and fatal events carry a stack trace when backtraces are
    /// enabled (`RUST_BACKTRACE`).
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        let id = self.routing.route(level);
        if !self.sink_enabled(id, level) {
            return;
        }
        let caller = self.capture_caller();
        let stack = if level >= Level::Panic {
            capture_stack()
        } else {
            None
        };

        let mut event = LogEvent::new(level, message).with_fields(fields);
        event.caller = caller;
        event.stack = stack.as_deref();
        self.write(id, &event);
    }

    /// Formatted message; nothing is formatted when the level is disabled
    #[track_caller]
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.log(level, &message(args), &[]);
    }

    /// Write an event built by the caller, routed by its level
    ///
    /// With caller capture on, an event without a caller gets this call site.
    #[track_caller]
    pub fn log_event(&self, event: &LogEvent<'_>) {
        let id = self.routing.route(event.level);
        if event.caller.is_none() && self.caller {
            let mut event = event.clone();
            event.caller = Some(Caller::here());
            self.write(id, &event);
        } else {
            self.write(id, event);
        }
    }

    /// Write to the request sink; a no-op unless `request_log` is set
    #[track_caller]
    pub fn request_info(&self, message: &str, fields: &[Field]) {
        let Some(id) = self.routing.route_request() else {
            return;
        };
        let caller = self.capture_caller();

        let mut event = LogEvent::new(Level::Info, message).with_fields(fields);
        event.caller = caller;
        self.write(id, &event);
    }

    #[track_caller]
    pub fn request_info_fmt(&self, args: fmt::Arguments<'_>) {
        if self.routing.route_request().is_none() {
            return;
        }
        self.request_info(&message(args), &[]);
    }

    /// Child logger whose lines carry `fields` before each event's own fields
    ///
    /// The child shares files and counters with its parent.
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Self {
        Self {
            routing: Arc::clone(&self.routing),
            sinks: self.sinks.iter().map(|sink| sink.with_fields(fields)).collect(),
            caller: self.caller,
        }
    }

    /// Whether an event at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        self.sink_enabled(self.routing.route(level), level)
    }

    /// Whether request calls write anything
    pub fn request_enabled(&self) -> bool {
        self.routing.route_request().is_some()
    }

    /// Flush every sink, returning the first failure
    ///
    /// Call before shutdown; buffered lines are lost otherwise.
    pub fn sync(&self) -> Result<()> {
        self.each_sink(Sink::sync)
    }

    /// Flush and close every sink, returning the first failure
    pub fn close(&self) -> Result<()> {
        let result = self.each_sink(Sink::close);
        tracing::info!(sinks = self.sinks.len(), "logger closed");
        result
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn sink(&self, file_type: FileType) -> Option<&Sink> {
        let id = self.routing.sink_id(file_type)?;
        self.sinks.get(id.as_usize())
    }

    /// Counters of every sink
    pub fn metrics(&self) -> Vec<(FileType, MetricsSnapshot)> {
        self.sinks
            .iter()
            .map(|sink| (sink.file_type(), sink.metrics()))
            .collect()
    }

    #[track_caller]
    fn capture_caller(&self) -> Option<Caller> {
        if self.caller {
            Some(Caller::here())
        } else {
            None
        }
    }

    fn sink_enabled(&self, id: SinkId, level: Level) -> bool {
        self.sinks
            .get(id.as_usize())
            .is_some_and(|sink| sink.enabled(level))
    }

    fn write(&self, id: SinkId, event: &LogEvent<'_>) {
        if let Some(sink) = self.sinks.get(id.as_usize()) {
            // Failures are counted and reported by the sink
            let _ = sink.write(event);
        }
    }

    fn each_sink(&self, op: impl Fn(&Sink) -> lumber_sinks::Result<()>) -> Result<()> {
        let mut first = None;
        for sink in &self.sinks {
            if let Err(e) = op(sink) {
                tracing::warn!(sink = %sink.name(), error = %e, "sink operation failed");
                first.get_or_insert(LumberError::sink(sink.name(), e));
            }
        }
        first.map_or(Ok(()), Err)
    }
}

fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
    match args.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(args.to_string()),
    }
}

fn capture_stack() -> Option<String> {
    let backtrace = Backtrace::capture();
    (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
}
