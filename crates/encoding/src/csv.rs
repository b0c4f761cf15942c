//! CSV line encoder
//!
//! Columns, in order: level, time, caller (only when captured), message,
//! context fields, event fields, then the stack trace when present. Values
//! only; keys are positional and never written.
//!
//! Every column is wrapped in double quotes. Strings are escaped (see
//! [`crate::escape`]), so a comma or quote inside a value never moves a column
//! boundary. Numbers, booleans and `<re><sign><im>i` complex numbers need no
//! escaping and are quoted as-is. Arrays, objects and reflected values have no
//! flat form: they are rendered as compact JSON and the whole text is quoted
//! as one column.
//!
//! This is a quoted, JSON-escaped hybrid, not RFC 4180 CSV:
//!
//! ```text
//! "info","2025-01-15T10:30:45.123Z","started","8080","he said, \"hi\"\n"
//! ```

use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};

use crate::append::{ValueEncoder, push_f32, push_f64, put_i64, put_u64, unix_nanos};
use crate::buffer_pool::BufferPool;
use crate::config::EncoderConfig;
use crate::encoder::{Encoder, EncoderCore, OutputFormat};
use crate::escape::escape_into;
use crate::event::{Caller, LogEvent};
use crate::field::{Field, FieldValue};
use crate::json::JsonWriter;
use crate::metrics::EncoderMetrics;
use crate::pool::EncoderPool;

/// Writes CSV columns into a borrowed buffer
struct CsvWriter<'a> {
    buf: &'a mut BytesMut,
    config: &'a EncoderConfig,
    scratch: &'a BufferPool,
    metrics: &'a EncoderMetrics,
}

impl<'a> CsvWriter<'a> {
    fn new(
        buf: &'a mut BytesMut,
        config: &'a EncoderConfig,
        scratch: &'a BufferPool,
        metrics: &'a EncoderMetrics,
    ) -> Self {
        Self {
            buf,
            config,
            scratch,
            metrics,
        }
    }

    /// Comma before every column except the first
    #[inline]
    fn separator(&mut self) {
        if !self.buf.is_empty() {
            self.buf.put_u8(b',');
        }
    }

    #[inline]
    fn quoted(&mut self, bytes: &[u8]) {
        self.buf.put_u8(b'"');
        let replaced = escape_into(self.buf, bytes);
        self.metrics.record_replaced(replaced);
        self.buf.put_u8(b'"');
    }

    /// Quote text that never needs escaping (numbers, booleans)
    #[inline]
    fn bare_quoted(&mut self, write: impl FnOnce(&mut BytesMut)) {
        self.separator();
        self.buf.put_u8(b'"');
        write(self.buf);
        self.buf.put_u8(b'"');
    }

    fn append_caller(&mut self, caller: &Caller, depth: usize) {
        self.separator();
        self.buf.put_u8(b'"');
        let replaced = escape_into(self.buf, caller.trimmed_file(depth).as_bytes());
        self.metrics.record_replaced(replaced);
        self.buf.put_u8(b':');
        put_u64(self.buf, u64::from(caller.line));
        self.buf.put_u8(b'"');
    }

    /// Render a nested value as JSON in a scratch buffer, then quote it as one column
    fn flattened(&mut self, render: impl FnOnce(&mut JsonWriter<'_>)) {
        self.metrics.record_nested();

        let mut scratch = self.scratch.get();
        render(&mut JsonWriter::new(&mut scratch, self.config, self.metrics));

        self.separator();
        self.quoted(&scratch);
        self.scratch.put(scratch);
    }
}

impl ValueEncoder for CsvWriter<'_> {
    fn append_bool(&mut self, v: bool) {
        self.bare_quoted(|buf| buf.put_slice(if v { b"true" } else { b"false" }));
    }

    fn append_i64(&mut self, v: i64) {
        self.bare_quoted(|buf| put_i64(buf, v));
    }

    fn append_u64(&mut self, v: u64) {
        self.bare_quoted(|buf| put_u64(buf, v));
    }

    fn append_f64(&mut self, v: f64) {
        self.bare_quoted(|buf| push_f64(buf, v));
    }

    fn append_f32(&mut self, v: f32) {
        self.bare_quoted(|buf| push_f32(buf, v));
    }

    fn append_str(&mut self, v: &str) {
        self.separator();
        self.quoted(v.as_bytes());
    }

    fn append_byte_str(&mut self, v: &[u8]) {
        self.separator();
        self.quoted(v);
    }

    fn append_time(&mut self, t: DateTime<Utc>) {
        let before = self.buf.len();
        let config = self.config;
        config.encode_time.encode(t, self);
        if self.buf.len() == before {
            self.append_i64(unix_nanos(t));
        }
    }

    fn append_array(&mut self, items: &[FieldValue]) {
        self.flattened(|json| json.append_array(items));
    }

    fn append_object(&mut self, fields: &[Field]) {
        self.flattened(|json| json.append_object(fields));
    }

    fn append_reflected(&mut self, v: &serde_json::Value) {
        self.flattened(|json| json.append_reflected(v));
    }

    fn append_complex_text(&mut self, text: &str) {
        self.metrics.record_complex();
        self.bare_quoted(|buf| buf.put_slice(text.as_bytes()));
    }
}

/// CSV line encoder
///
/// Cheap to clone: the configuration, instance pool and metrics are shared,
/// and only the pre-encoded context bytes are copied.
#[derive(Debug, Clone)]
pub struct CsvEncoder {
    core: EncoderCore,
}

impl CsvEncoder {
    pub fn new(config: EncoderConfig, pool: Arc<EncoderPool>) -> Self {
        Self {
            core: EncoderCore::new(config, pool),
        }
    }
}

impl Encoder for CsvEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn encode_entry(&self, event: &LogEvent<'_>) -> BytesMut {
        let core = &self.core;
        let mut checkout = core.pool.checkout(&core.config);
        let Some((config, buf)) = checkout.parts() else {
            return BytesMut::new();
        };

        let mut w = CsvWriter::new(buf, config, core.pool.buffers(), &core.metrics);

        if !config.level_key.is_empty() {
            let before = w.buf.len();
            config.encode_level.encode(event.level, &mut w);
            if w.buf.len() == before {
                w.append_str(event.level.as_str());
            }
        }
        if !config.time_key.is_empty() {
            w.append_time(event.time);
        }
        if let Some(caller) = &event.caller
            && !config.caller_key.is_empty()
        {
            w.append_caller(caller, config.caller_depth);
        }
        if !config.message_key.is_empty() {
            w.append_str(event.message);
        }

        let at_start = w.buf.is_empty();
        core.put_context(w.buf, at_start);

        for field in event.fields {
            field.value.append_to(&mut w);
        }

        if let Some(stack) = event.stack
            && !config.stacktrace_key.is_empty()
        {
            w.append_str(stack);
        }

        w.buf.put_slice(config.line_ending.as_bytes());

        core.metrics.record_line();
        checkout.take_buffer()
    }

    fn add_fields(&mut self, fields: &[Field]) {
        let core = &mut self.core;
        let mut w = CsvWriter::new(
            &mut core.context,
            &core.config,
            core.pool.buffers(),
            &core.metrics,
        );
        for field in fields {
            field.value.append_to(&mut w);
        }
    }

    fn clone_box(&self) -> Box<dyn Encoder> {
        Box::new(self.clone())
    }

    fn recycle(&self, line: BytesMut) {
        self.core.recycle(line);
    }

    fn metrics(&self) -> &EncoderMetrics {
        &self.core.metrics
    }
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod csv_test;
