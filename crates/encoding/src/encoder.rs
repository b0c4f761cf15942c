//! Encoder trait and output formats
//!
//! A sink owns one boxed [`Encoder`] and treats it as a read-only template:
//! `encode_entry` takes `&self`, checks an [`EncoderInstance`] out of the
//! shared pool for the duration of the call and returns the finished line.
//! Concurrent callers therefore never observe each other's partial output.
//!
//! [`EncoderInstance`]: crate::pool::EncoderInstance

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use serde::Deserialize;

use crate::config::EncoderConfig;
use crate::csv::CsvEncoder;
use crate::error::EncodingError;
use crate::event::LogEvent;
use crate::field::Field;
use crate::json::JsonEncoder;
use crate::metrics::EncoderMetrics;
use crate::pool::EncoderPool;

/// Wire format of a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Parse a format name, falling back to JSON for unknown names
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(EncodingError::unknown_format(s)),
        }
    }
}

impl From<String> for OutputFormat {
    fn from(s: String) -> Self {
        Self::parse_lossy(&s)
    }
}

/// Serializes log events into terminated lines
pub trait Encoder: Send + Sync + fmt::Debug {
    fn format(&self) -> OutputFormat;

    /// Encode one event into a finished line drawn from the buffer pool
    ///
    /// Never fails. Hand the line back with [`Encoder::recycle`] once written.
    fn encode_entry(&self, event: &LogEvent<'_>) -> BytesMut;

    /// Attach context fields, emitted before every event's own fields
    fn add_fields(&mut self, fields: &[Field]);

    /// Independent copy carrying the context attached so far
    fn clone_box(&self) -> Box<dyn Encoder>;

    /// Return a written line's buffer to the pool
    fn recycle(&self, line: BytesMut);

    /// Degradation counters, shared with every clone
    fn metrics(&self) -> &EncoderMetrics;
}

impl Clone for Box<dyn Encoder> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Build the encoder for `format`
pub fn new_encoder(
    format: OutputFormat,
    config: EncoderConfig,
    pool: Arc<EncoderPool>,
) -> Box<dyn Encoder> {
    match format {
        OutputFormat::Json => Box::new(JsonEncoder::new(config, pool)),
        OutputFormat::Csv => Box::new(CsvEncoder::new(config, pool)),
    }
}

/// State shared by the CSV and JSON encoders
#[derive(Clone)]
pub(crate) struct EncoderCore {
    pub(crate) config: Arc<EncoderConfig>,
    pub(crate) pool: Arc<EncoderPool>,
    pub(crate) metrics: Arc<EncoderMetrics>,
    /// Pre-encoded context fields, without a leading separator
    pub(crate) context: BytesMut,
}

impl EncoderCore {
    pub(crate) fn new(config: EncoderConfig, pool: Arc<EncoderPool>) -> Self {
        Self {
            config: Arc::new(config),
            pool,
            metrics: Arc::new(EncoderMetrics::new()),
            context: BytesMut::new(),
        }
    }

    /// Copy the context into `buf`, adding a separator unless `at_start`
    pub(crate) fn put_context(&self, buf: &mut BytesMut, at_start: bool) {
        if self.context.is_empty() {
            return;
        }
        if !at_start {
            buf.put_u8(b',');
        }
        buf.put_slice(&self.context);
    }

    pub(crate) fn recycle(&self, line: BytesMut) {
        self.pool.buffers().put(line);
    }
}

impl fmt::Debug for EncoderCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderCore")
            .field("config", &self.config)
            .field("context_len", &self.context.len())
            .finish()
    }
}
