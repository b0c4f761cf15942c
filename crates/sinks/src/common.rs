//! Common types for sinks
//!
//! Errors and counters shared by the rotating file and the sink wrapping it.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Per-sink counters
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Lines handed to the rotating file
    pub lines_written: AtomicU64,

    /// Bytes handed to the rotating file
    pub bytes_written: AtomicU64,

    /// Writes the rotating file rejected
    pub write_errors: AtomicU64,

    /// Events below the sink's threshold
    pub filtered: AtomicU64,

    /// Flush operations performed
    pub flush_count: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn line_written(&self, bytes: u64) {
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn flush(&self) {
        self.flush_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_written: self.lines_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            flush_count: self.flush_count.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.flush_count.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_written: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
    pub filtered: u64,
    pub flush_count: u64,
}

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O error from the log file or its backups
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single line larger than the file size limit
    #[error("write length {size} exceeds maximum file size {max}")]
    TooLarge { size: u64, max: u64 },

    /// Backup compression failed
    #[error("compression failed for {path}: {reason}")]
    Compression { path: String, reason: String },
}

impl SinkError {
    pub fn too_large(size: u64, max: u64) -> Self {
        Self::TooLarge { size, max }
    }

    pub fn compression(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Compression {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod common_test;
