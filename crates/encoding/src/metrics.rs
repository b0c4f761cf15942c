//! Degraded-encoding counters
//!
//! Encoding never fails. Values a format can only approximate are counted
//! here instead, so an operator can tell how much of the output is lossy.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by an encoder and all of its clones
#[derive(Debug, Default)]
pub struct EncoderMetrics {
    /// Lines encoded
    pub lines: AtomicU64,

    /// Complex numbers rendered as text
    pub complex: AtomicU64,

    /// Arrays, objects and reflected values flattened into one column
    pub nested: AtomicU64,

    /// Invalid UTF-8 bytes replaced while escaping
    pub replaced: AtomicU64,
}

impl EncoderMetrics {
    pub const fn new() -> Self {
        Self {
            lines: AtomicU64::new(0),
            complex: AtomicU64::new(0),
            nested: AtomicU64::new(0),
            replaced: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_line(&self) {
        self.lines.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_complex(&self) {
        self.complex.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_nested(&self) {
        self.nested.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_replaced(&self, count: usize) {
        if count > 0 {
            self.replaced.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> EncoderSnapshot {
        EncoderSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            complex: self.complex.load(Ordering::Relaxed),
            nested: self.nested.load(Ordering::Relaxed),
            replaced: self.replaced.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`EncoderMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderSnapshot {
    pub lines: u64,
    pub complex: u64,
    pub nested: u64,
    pub replaced: u64,
}

impl EncoderSnapshot {
    /// Total number of degraded values
    pub fn degraded(&self) -> u64 {
        self.complex + self.nested + self.replaced
    }
}
