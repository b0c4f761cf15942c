//! Escaping for quoted scalar values
//!
//! Values are written between double quotes, so the escaper must guarantee
//! that no raw `"` or line break reaches the output. The scan is byte-wise:
//!
//! - printable ASCII other than `\` and `"` is copied as-is
//! - `\` and `"` get a leading backslash
//! - `\n`, `\r`, `\t` become two-character escapes
//! - any other byte below 0x20 becomes `\u00XX` (lowercase hex)
//! - valid multi-byte UTF-8 sequences are copied as-is
//! - a byte that does not start a valid sequence becomes `\ufffd` and the
//!   scan advances by exactly one byte

use bytes::{BufMut, BytesMut};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Escape `input` into `buf`, returning how many invalid bytes were replaced
pub fn escape_into(buf: &mut BytesMut, input: &[u8]) -> usize {
    let mut replaced = 0;
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        if b < 0x80 {
            escape_ascii(buf, b);
            i += 1;
            continue;
        }

        match utf8_sequence_len(&input[i..]) {
            Some(len) => {
                buf.put_slice(&input[i..i + len]);
                i += len;
            }
            None => {
                buf.put_slice(b"\\ufffd");
                replaced += 1;
                i += 1;
            }
        }
    }

    replaced
}

/// Escape a string into `buf`
#[inline]
pub fn escape_str_into(buf: &mut BytesMut, input: &str) {
    // A &str is valid UTF-8, so nothing is ever replaced here
    let _ = escape_into(buf, input.as_bytes());
}

#[inline]
fn escape_ascii(buf: &mut BytesMut, b: u8) {
    match b {
        b'\\' | b'"' => {
            buf.put_u8(b'\\');
            buf.put_u8(b);
        }
        b'\n' => buf.put_slice(b"\\n"),
        b'\r' => buf.put_slice(b"\\r"),
        b'\t' => buf.put_slice(b"\\t"),
        0x00..=0x1f => {
            buf.put_slice(b"\\u00");
            buf.put_u8(HEX[(b >> 4) as usize]);
            buf.put_u8(HEX[(b & 0x0f) as usize]);
        }
        _ => buf.put_u8(b),
    }
}

/// Length of the valid UTF-8 sequence starting at `bytes[0]`, if any
#[inline]
fn utf8_sequence_len(bytes: &[u8]) -> Option<usize> {
    let len = match bytes[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };
    let seq = bytes.get(..len)?;
    // from_utf8 rejects overlong forms, surrogates and out-of-range scalars
    std::str::from_utf8(seq).ok().map(|_| len)
}

#[cfg(test)]
#[path = "escape_test.rs"]
mod escape_test;
