//! JSON line encoder
//!
//! One object per line: `level`, `ts`, `caller` (when captured), `msg`,
//! `stacktrace` (when present), then context fields and event fields as
//! `"key":value` in order. Arrays, objects and reflected values are real
//! JSON. Non-finite floats and complex numbers are quoted strings.

use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};

use crate::append::{ValueEncoder, push_f32, push_f64, put_i64, put_u64, unix_nanos};
use crate::config::EncoderConfig;
use crate::encoder::{Encoder, EncoderCore, OutputFormat};
use crate::escape::escape_into;
use crate::event::{Caller, LogEvent};
use crate::field::{Field, FieldValue};
use crate::metrics::EncoderMetrics;
use crate::pool::EncoderPool;

/// Writes JSON values into a borrowed buffer
///
/// Also used by the CSV encoder to flatten nested values into one column.
pub(crate) struct JsonWriter<'a> {
    buf: &'a mut BytesMut,
    config: &'a EncoderConfig,
    metrics: &'a EncoderMetrics,
}

impl<'a> JsonWriter<'a> {
    pub(crate) fn new(
        buf: &'a mut BytesMut,
        config: &'a EncoderConfig,
        metrics: &'a EncoderMetrics,
    ) -> Self {
        Self {
            buf,
            config,
            metrics,
        }
    }

    #[inline]
    fn separator(&mut self) {
        match self.buf.last() {
            None | Some(b'{' | b'[' | b':' | b',') => {}
            Some(_) => self.buf.put_u8(b','),
        }
    }

    #[inline]
    fn quoted(&mut self, bytes: &[u8]) {
        self.buf.put_u8(b'"');
        let replaced = escape_into(self.buf, bytes);
        self.metrics.record_replaced(replaced);
        self.buf.put_u8(b'"');
    }

    pub(crate) fn add_key(&mut self, key: &str) {
        self.separator();
        self.quoted(key.as_bytes());
        self.buf.put_u8(b':');
    }

    pub(crate) fn append_caller(&mut self, caller: &Caller, depth: usize) {
        self.separator();
        self.buf.put_u8(b'"');
        let replaced = escape_into(self.buf, caller.trimmed_file(depth).as_bytes());
        self.metrics.record_replaced(replaced);
        self.buf.put_u8(b':');
        put_u64(self.buf, u64::from(caller.line));
        self.buf.put_u8(b'"');
    }

    fn append_json(&mut self, value: &serde_json::Value) {
        use serde_json::Value;

        match value {
            Value::Null => {
                self.separator();
                self.buf.put_slice(b"null");
            }
            Value::Bool(b) => self.append_bool(*b),
            Value::Number(n) => {
                self.separator();
                let _ = write!(self.buf, "{n}");
            }
            Value::String(s) => self.append_str(s),
            Value::Array(items) => {
                self.separator();
                self.buf.put_u8(b'[');
                for item in items {
                    self.append_json(item);
                }
                self.buf.put_u8(b']');
            }
            Value::Object(map) => {
                self.separator();
                self.buf.put_u8(b'{');
                for (key, item) in map {
                    self.add_key(key);
                    self.append_json(item);
                }
                self.buf.put_u8(b'}');
            }
        }
    }

    fn non_finite(&mut self, text: &str) {
        self.separator();
        self.quoted(text.as_bytes());
    }
}

impl ValueEncoder for JsonWriter<'_> {
    fn append_bool(&mut self, v: bool) {
        self.separator();
        self.buf.put_slice(if v { b"true" } else { b"false" });
    }

    fn append_i64(&mut self, v: i64) {
        self.separator();
        put_i64(self.buf, v);
    }

    fn append_u64(&mut self, v: u64) {
        self.separator();
        put_u64(self.buf, v);
    }

    fn append_f64(&mut self, v: f64) {
        if v.is_finite() {
            self.separator();
            push_f64(&mut *self.buf, v);
        } else {
            let mut text = String::with_capacity(4);
            push_f64(&mut text, v);
            self.non_finite(&text);
        }
    }

    fn append_f32(&mut self, v: f32) {
        if v.is_finite() {
            self.separator();
            push_f32(&mut *self.buf, v);
        } else {
            let mut text = String::with_capacity(4);
            push_f32(&mut text, v);
            self.non_finite(&text);
        }
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
        self.separator();
        self.buf.put_u8(b'[');
        for item in items {
            item.append_to(self);
        }
        self.buf.put_u8(b']');
    }

    fn append_object(&mut self, fields: &[Field]) {
        self.separator();
        self.buf.put_u8(b'{');
        for field in fields {
            self.add_key(field.key());
            field.value.append_to(self);
        }
        self.buf.put_u8(b'}');
    }

    fn append_reflected(&mut self, v: &serde_json::Value) {
        self.append_json(v);
    }

    fn append_complex_text(&mut self, text: &str) {
        self.metrics.record_complex();
        self.separator();
        self.quoted(text.as_bytes());
    }
}

/// JSON line encoder
#[derive(Debug, Clone)]
pub struct JsonEncoder {
    core: EncoderCore,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig, pool: Arc<EncoderPool>) -> Self {
        Self {
            core: EncoderCore::new(config, pool),
        }
    }
}

impl Encoder for JsonEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn encode_entry(&self, event: &LogEvent<'_>) -> BytesMut {
        let core = &self.core;
        let mut checkout = core.pool.checkout(&core.config);
        let Some((config, buf)) = checkout.parts() else {
            return BytesMut::new();
        };

        buf.put_u8(b'{');
        let mut w = JsonWriter::new(buf, config, &core.metrics);

        if !config.level_key.is_empty() {
            w.add_key(&config.level_key);
            let before = w.buf.len();
            config.encode_level.encode(event.level, &mut w);
            if w.buf.len() == before {
                w.append_str(event.level.as_str());
            }
        }
        if !config.time_key.is_empty() {
            w.add_key(&config.time_key);
            w.append_time(event.time);
        }
        if let Some(caller) = &event.caller
            && !config.caller_key.is_empty()
        {
            w.add_key(&config.caller_key);
            w.append_caller(caller, config.caller_depth);
        }
        if !config.message_key.is_empty() {
            w.add_key(&config.message_key);
            w.append_str(event.message);
        }
        if let Some(stack) = event.stack
            && !config.stacktrace_key.is_empty()
        {
            w.add_key(&config.stacktrace_key);
            w.append_str(stack);
        }

        let at_start = w.buf.last() == Some(&b'{');
        core.put_context(w.buf, at_start);

        for field in event.fields {
            w.add_key(field.key());
            field.value.append_to(&mut w);
        }

        w.buf.put_u8(b'}');
        w.buf.put_slice(config.line_ending.as_bytes());

        core.metrics.record_line();
        checkout.take_buffer()
    }

    fn add_fields(&mut self, fields: &[Field]) {
        let core = &mut self.core;
        let mut w = JsonWriter::new(&mut core.context, &core.config, &core.metrics);
        for field in fields {
            w.add_key(field.key());
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
#[path = "json_test.rs"]
mod json_test;
