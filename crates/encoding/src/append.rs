//! Append contract shared by every output format
//!
//! Each [`FieldValue`] kind maps to one method here. Encoders implement the
//! scalar methods; the provided defaults pin down the kinds whose rendering is
//! the same everywhere (binary is base64 text, durations are nanoseconds,
//! complex numbers are `<re><sign><im>i`).
//!
//! None of these methods can fail. Kinds a format cannot represent degrade to
//! a readable approximation.

use std::fmt::Write as FmtWrite;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};

use crate::field::{Field, FieldValue};

/// Sink for field values, implemented by each output format
pub trait ValueEncoder {
    fn append_bool(&mut self, v: bool);
    fn append_i64(&mut self, v: i64);
    fn append_u64(&mut self, v: u64);
    fn append_f64(&mut self, v: f64);
    fn append_f32(&mut self, v: f32);

    /// Append a UTF-8 string (quoted and escaped by the format)
    fn append_str(&mut self, v: &str);

    /// Append raw bytes, escaped with the same rules as strings
    fn append_byte_str(&mut self, v: &[u8]);

    /// Append a timestamp through the configured time encoder
    fn append_time(&mut self, t: DateTime<Utc>);

    fn append_array(&mut self, items: &[FieldValue]);
    fn append_object(&mut self, fields: &[Field]);
    fn append_reflected(&mut self, v: &serde_json::Value);

    /// Append a complex number as a bare `<re><sign><im>i` token
    fn append_complex_text(&mut self, text: &str);

    fn append_binary(&mut self, v: &[u8]) {
        let encoded = BASE64.encode(v);
        self.append_str(&encoded);
    }

    fn append_duration(&mut self, d: Duration) {
        self.append_i64(duration_nanos(d));
    }

    fn append_complex128(&mut self, re: f64, im: f64) {
        let mut text = String::with_capacity(32);
        write_complex(&mut text, &FloatText::F64(re), &FloatText::F64(im));
        self.append_complex_text(&text);
    }

    fn append_complex64(&mut self, re: f32, im: f32) {
        let mut text = String::with_capacity(24);
        write_complex(&mut text, &FloatText::F32(re), &FloatText::F32(im));
        self.append_complex_text(&text);
    }
}

/// Nanoseconds in a duration, saturating at `i64::MAX`
#[inline]
pub fn duration_nanos(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

/// Nanoseconds since the Unix epoch, saturating outside the i64 range
#[inline]
pub fn unix_nanos(t: DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt().unwrap_or(if t.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}

enum FloatText {
    F32(f32),
    F64(f64),
}

impl FloatText {
    fn is_sign_negative(&self) -> bool {
        match self {
            Self::F32(v) => v.is_sign_negative() && !v.is_nan(),
            Self::F64(v) => v.is_sign_negative() && !v.is_nan(),
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::F32(v) => push_f32(out, *v),
            Self::F64(v) => push_f64(out, *v),
        }
    }
}

fn write_complex(out: &mut String, re: &FloatText, im: &FloatText) {
    re.write(out);
    if !im.is_sign_negative() {
        out.push('+');
    }
    im.write(out);
    out.push('i');
}

/// Shortest decimal text for an f64; `NaN`, `+Inf`, `-Inf` for non-finite values
pub fn push_f64<W: FmtWrite>(out: &mut W, v: f64) {
    let _ = if v.is_nan() {
        out.write_str("NaN")
    } else if v.is_infinite() {
        out.write_str(if v > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        write!(out, "{v}")
    };
}

/// Shortest decimal text for an f32; `NaN`, `+Inf`, `-Inf` for non-finite values
pub fn push_f32<W: FmtWrite>(out: &mut W, v: f32) {
    let _ = if v.is_nan() {
        out.write_str("NaN")
    } else if v.is_infinite() {
        out.write_str(if v > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        write!(out, "{v}")
    };
}

/// Append the decimal form of an i64 without allocating
pub fn put_i64(buf: &mut BytesMut, v: i64) {
    if v < 0 {
        buf.put_u8(b'-');
    }
    put_u64(buf, v.unsigned_abs());
}

/// Append the decimal form of a u64 without allocating
pub fn put_u64(buf: &mut BytesMut, mut v: u64) {
    let mut digits = [0u8; 20];
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    buf.put_slice(&digits[pos..]);
}
