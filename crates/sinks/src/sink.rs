//! Encoding sink over a rotating file
//!
//! A [`Sink`] owns one encoder template and one [`RollingFile`]. Writes
//! below the sink's threshold are dropped; the rest are encoded into a
//! pooled line, written under the file's mutex and the line buffer is handed
//! back to the pool.
//!
//! Cloning a sink is cheap and shares the file, metrics and failure
//! reporter. [`Sink::with_fields`] clones it with extra context fields baked
//! into its encoder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumber_encoding::{
    Encoder, EncoderConfig, EncoderPool, Field, Level, LogEvent, OutputFormat, new_encoder,
};
use lumber_routing::FileType;
use parking_lot::Mutex;

use crate::common::{MetricsSnapshot, Result, SinkMetrics};
use crate::rotation::{
    DEFAULT_BUFFER_SIZE, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB,
    RollingFile, RotationConfig,
};
use crate::util::RateLimitedLogger;

/// Extension forced onto CSV sink paths
pub const CSV_EXTENSION: &str = "csv";

/// Append `.csv` unless the path already ends with it
pub fn ensure_csv_suffix(path: &Path) -> PathBuf {
    let has_suffix = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION));
    if has_suffix {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(CSV_EXTENSION);
    PathBuf::from(name)
}

/// Settings for one sink
#[derive(Debug, Clone)]
pub struct SinkSettings {
    /// Destination path; CSV sinks get a `.csv` suffix when it is missing
    pub path: PathBuf,

    /// Events below this level are dropped
    pub level: Level,

    pub format: OutputFormat,

    /// Size limit of the current file in megabytes
    pub max_size_mb: u64,

    /// Backups to retain (0 keeps all)
    pub max_backups: usize,

    /// Maximum backup age in days (0 disables age pruning)
    pub max_age_days: u32,

    pub compress: bool,

    pub local_time: bool,

    /// Write the call site of each event
    pub caller: bool,

    pub encoder: EncoderConfig,

    pub buffer_size: usize,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs/app.log"),
            level: Level::Info,
            format: OutputFormat::Json,
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            compress: true,
            local_time: true,
            caller: false,
            encoder: EncoderConfig::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl SinkSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Path the sink writes to
    pub fn resolved_path(&self) -> PathBuf {
        match self.format {
            OutputFormat::Csv => ensure_csv_suffix(&self.path),
            OutputFormat::Json => self.path.clone(),
        }
    }

    pub fn rotation_config(&self) -> RotationConfig {
        RotationConfig::new(self.resolved_path())
            .with_max_size_mb(self.max_size_mb)
            .with_max_backups(self.max_backups)
            .with_max_age_days(self.max_age_days)
            .with_compress(self.compress)
            .with_local_time(self.local_time)
            .with_buffer_size(self.buffer_size)
    }
}

/// One independently configured and rotated log destination
#[derive(Debug, Clone)]
pub struct Sink {
    file_type: FileType,
    settings: Arc<SinkSettings>,
    encoder: Box<dyn Encoder>,
    file: Arc<Mutex<RollingFile>>,
    metrics: Arc<SinkMetrics>,
    errors: Arc<RateLimitedLogger>,
}

impl Sink {
    /// Create a sink; the file is opened on the first write
    pub fn new(file_type: FileType, settings: SinkSettings, pool: Arc<EncoderPool>) -> Self {
        let encoder = new_encoder(settings.format, settings.encoder.clone(), pool);
        let file = RollingFile::new(settings.rotation_config());

        tracing::debug!(
            sink = %file_type,
            path = %file.path().display(),
            format = %settings.format,
            level = %settings.level,
            "sink created"
        );

        Self {
            file_type,
            settings: Arc::new(settings),
            encoder,
            file: Arc::new(Mutex::new(file)),
            metrics: Arc::new(SinkMetrics::new()),
            errors: Arc::new(RateLimitedLogger::default()),
        }
    }

    /// Replace the failure reporter, e.g. to change its interval
    #[must_use]
    pub fn with_error_reporter(mut self, errors: RateLimitedLogger) -> Self {
        self.errors = Arc::new(errors);
        self
    }

    pub fn name(&self) -> &'static str {
        self.file_type.as_str()
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn settings(&self) -> &SinkSettings {
        &self.settings
    }

    pub fn format(&self) -> OutputFormat {
        self.encoder.format()
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    /// Path of the current file
    pub fn path(&self) -> PathBuf {
        self.file.lock().path().to_path_buf()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn error_reporter(&self) -> &RateLimitedLogger {
        &self.errors
    }

    /// Whether an event at `level` passes this sink's threshold
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled_at(self.settings.level)
    }

    /// Encode and append one event
    ///
    /// Events below the threshold are counted and dropped. A failed write is
    /// counted, reported (rate limited) and returned.
    pub fn write(&self, event: &LogEvent<'_>) -> Result<()> {
        if !self.enabled(event.level) {
            self.metrics.filtered();
            return Ok(());
        }

        let line = if event.caller.is_some() && !self.settings.caller {
            let mut event = event.clone();
            event.caller = None;
            self.encoder.encode_entry(&event)
        } else {
            self.encoder.encode_entry(event)
        };

        let result = self.file.lock().write(&line);
        match &result {
            Ok(written) => self.metrics.line_written(*written as u64),
            Err(e) => {
                self.metrics.write_error();
                self.errors
                    .error_with_data(self.name(), "failed to write log line", e, &line);
            }
        }

        self.encoder.recycle(line);
        result.map(|_| ())
    }

    /// Child sink whose lines carry `fields` before each event's own fields
    #[must_use]
    pub fn with_fields(&self, fields: &[Field]) -> Self {
        let mut child = self.clone();
        child.encoder.add_fields(fields);
        child
    }

    /// Flush buffered lines to the file
    pub fn sync(&self) -> Result<()> {
        self.metrics.flush();
        self.file.lock().flush()
    }

    /// Flush and close the file; a later write reopens it
    pub fn close(&self) -> Result<()> {
        self.metrics.flush();
        self.file.lock().close()?;
        tracing::debug!(sink = %self.file_type, "sink closed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
