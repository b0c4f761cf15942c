//! Field value model
//!
//! A [`Field`] is one key/value pair attached to a log event. Keys need not be
//! unique; duplicates are kept in order. The value is exactly one of the
//! [`FieldValue`] kinds, each with a fixed serialization rule (see
//! [`FieldValue::append_to`]).

use std::borrow::Cow;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::append::ValueEncoder;

/// One value an event field may carry
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Isize(isize),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Usize(usize),
    Float32(f32),
    Float64(f64),
    /// `(real, imaginary)`
    Complex64(f32, f32),
    /// `(real, imaginary)`
    Complex128(f64, f64),
    String(String),
    /// Raw bytes escaped like a string
    ByteString(Vec<u8>),
    /// Opaque bytes, base64-encoded before escaping
    Binary(Vec<u8>),
    /// Rendered as integer nanoseconds
    Duration(Duration),
    /// Rendered through the configured time encoder
    Time(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Object(Vec<Field>),
    /// Any serializable value, captured as JSON at construction
    Reflected(serde_json::Value),
}

impl FieldValue {
    /// Append this value through the encoder's append contract
    ///
    /// Every kind maps onto exactly one append call; nested kinds are left to
    /// the encoder, which decides how much structure it can represent.
    pub fn append_to(&self, enc: &mut dyn ValueEncoder) {
        match self {
            Self::Bool(v) => enc.append_bool(*v),
            Self::Int8(v) => enc.append_i64(i64::from(*v)),
            Self::Int16(v) => enc.append_i64(i64::from(*v)),
            Self::Int32(v) => enc.append_i64(i64::from(*v)),
            Self::Int64(v) => enc.append_i64(*v),
            Self::Isize(v) => enc.append_i64(*v as i64),
            Self::Uint8(v) => enc.append_u64(u64::from(*v)),
            Self::Uint16(v) => enc.append_u64(u64::from(*v)),
            Self::Uint32(v) => enc.append_u64(u64::from(*v)),
            Self::Uint64(v) => enc.append_u64(*v),
            Self::Usize(v) => enc.append_u64(*v as u64),
            Self::Float32(v) => enc.append_f32(*v),
            Self::Float64(v) => enc.append_f64(*v),
            Self::Complex64(re, im) => enc.append_complex64(*re, *im),
            Self::Complex128(re, im) => enc.append_complex128(*re, *im),
            Self::String(v) => enc.append_str(v),
            Self::ByteString(v) => enc.append_byte_str(v),
            Self::Binary(v) => enc.append_binary(v),
            Self::Duration(v) => enc.append_duration(*v),
            Self::Time(v) => enc.append_time(*v),
            Self::Array(items) => enc.append_array(items),
            Self::Object(fields) => enc.append_object(fields),
            Self::Reflected(v) => enc.append_reflected(v),
        }
    }

    /// Whether this kind has no flat textual form and is approximated
    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_) | Self::Reflected(_))
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Isize,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Usize,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Duration => Duration,
    DateTime<Utc> => Time,
}

impl From<&str> for FieldValue {
    #[inline]
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

/// A key/value pair attached to a log event
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: FieldValue,
}

impl Field {
    /// Create a field from anything convertible to a value
    #[inline]
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Raw bytes, escaped like a string
    pub fn byte_string(key: impl Into<Cow<'static, str>>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::ByteString(bytes.into()))
    }

    /// Opaque binary, base64-encoded on output
    pub fn binary(key: impl Into<Cow<'static, str>>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::Binary(bytes.into()))
    }

    pub fn complex64(key: impl Into<Cow<'static, str>>, re: f32, im: f32) -> Self {
        Self::new(key, FieldValue::Complex64(re, im))
    }

    pub fn complex128(key: impl Into<Cow<'static, str>>, re: f64, im: f64) -> Self {
        Self::new(key, FieldValue::Complex128(re, im))
    }

    /// Nested object built from fields
    pub fn object(key: impl Into<Cow<'static, str>>, fields: Vec<Field>) -> Self {
        Self::new(key, FieldValue::Object(fields))
    }

    /// Any serializable value
    ///
    /// Serialization failures never surface: the error text is kept as a
    /// string value instead.
    pub fn reflected<T: Serialize + ?Sized>(key: impl Into<Cow<'static, str>>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| serde_json::Value::String(format!("<unserializable: {e}>")));
        Self::new(key, FieldValue::Reflected(value))
    }

    /// Key as a string slice
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(FieldValue::from(true), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(-3i8), FieldValue::Int8(-3));
        assert_eq!(FieldValue::from(7u64), FieldValue::Uint64(7));
        assert_eq!(FieldValue::from("hi"), FieldValue::String("hi".into()));
        assert_eq!(
            FieldValue::from(Duration::from_millis(1)),
            FieldValue::Duration(Duration::from_millis(1))
        );
    }

    #[test]
    fn test_from_vec() {
        let value = FieldValue::from(vec![1i64, 2, 3]);
        assert_eq!(
            value,
            FieldValue::Array(vec![
                FieldValue::Int64(1),
                FieldValue::Int64(2),
                FieldValue::Int64(3)
            ])
        );
        assert!(value.is_nested());
    }

    #[test]
    fn test_field_keys_static_and_owned() {
        let a = Field::new("static", 1i32);
        let b = Field::new(String::from("owned"), 2i32);
        assert_eq!(a.key(), "static");
        assert_eq!(b.key(), "owned");
    }

    #[test]
    fn test_reflected_captures_json() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let field = Field::reflected("point", &Point { x: 1, y: 2 });
        assert_eq!(
            field.value,
            FieldValue::Reflected(serde_json::json!({"x": 1, "y": 2}))
        );
    }

    #[test]
    fn test_reflected_unserializable_degrades_to_string() {
        use std::collections::HashMap;

        // Non-string map keys cannot become JSON object keys
        let mut map = HashMap::new();
        map.insert((1, 2), "v");
        let field = Field::reflected("map", &map);
        match field.value {
            FieldValue::Reflected(serde_json::Value::String(s)) => {
                assert!(s.starts_with("<unserializable"));
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}
