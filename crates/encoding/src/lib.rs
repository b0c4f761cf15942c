//! Lumber encoding - log events and the lines they become
//!
//! A [`LogEvent`] carries a level, timestamp, optional caller, message,
//! optional stack trace and ordered [`Field`]s. An [`Encoder`] turns it into
//! one terminated line, either CSV ([`CsvEncoder`]) or JSON ([`JsonEncoder`]).
//!
//! # Pooling
//!
//! Encoders are shared, read-only templates. Each `encode_entry` call checks
//! an instance out of an [`EncoderPool`] and writes into a buffer from a
//! [`BufferPool`]; both pools are lock-free and never block. The finished
//! line goes back to the buffer pool through [`Encoder::recycle`] once the
//! sink has written it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lumber_encoding::{CsvEncoder, Encoder, EncoderConfig, EncoderPool, Field, Level, LogEvent};
//!
//! let encoder = CsvEncoder::new(EncoderConfig::default(), Arc::new(EncoderPool::default()));
//! let fields = [Field::new("port", 8080u16)];
//! let event = LogEvent::new(Level::Info, "listening").with_fields(&fields);
//!
//! let line = encoder.encode_entry(&event);
//! assert!(line.starts_with(b"\"info\","));
//! assert!(line.ends_with(b",\"listening\",\"8080\"\n"));
//! encoder.recycle(line);
//! ```

pub mod append;
pub mod buffer_pool;
pub mod config;
pub mod csv;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod event;
pub mod field;
pub mod json;
pub mod level;
pub mod metrics;
pub mod pool;

pub use append::ValueEncoder;
pub use buffer_pool::{BufferPool, PoolMetrics, PoolSnapshot};
pub use config::{EncoderConfig, LevelEncoder, TimeEncoder};
pub use csv::CsvEncoder;
pub use encoder::{Encoder, OutputFormat, new_encoder};
pub use error::{EncodingError, Result};
pub use event::{Caller, LogEvent};
pub use field::{Field, FieldValue};
pub use json::JsonEncoder;
pub use level::Level;
pub use metrics::{EncoderMetrics, EncoderSnapshot};
pub use pool::{Checkout, EncoderInstance, EncoderPool};
