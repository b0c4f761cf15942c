//! Lock-free pool of reusable line buffers
//!
//! Every encoded line is built in a `BytesMut` drawn from this pool and
//! handed back once the sink has written it, so steady-state logging does
//! not allocate per event.
//!
//! # Retention
//!
//! A buffer that grew past `max_retained` (one huge line) is dropped on
//! return instead of pinning that memory in the pool forever.
//!
//! # Example
//!
//! ```
//! use lumber_encoding::BufferPool;
//!
//! let pool = BufferPool::new(16, 1024);
//!
//! let mut buf = pool.get();
//! buf.extend_from_slice(b"\"info\",\"started\"\n");
//! // ... hand the line to a sink ...
//! pool.put(buf);
//!
//! assert_eq!(pool.available(), 16);
//! ```

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of pooled buffers
pub const DEFAULT_POOL_SIZE: usize = 256;

/// Default capacity of each pooled buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Default largest capacity kept on return (64KB)
pub const DEFAULT_MAX_RETAINED: usize = 64 * 1024;

/// Lock-free pool of reusable `BytesMut` buffers
///
/// `get` never blocks and never fails: an empty pool allocates a fresh
/// buffer. `put` clears the buffer and keeps it if there is room.
pub struct BufferPool {
    /// Lock-free queue of available buffers
    queue: ArrayQueue<BytesMut>,

    /// Capacity for each buffer
    buffer_capacity: usize,

    /// Buffers above this capacity are dropped on return
    max_retained: usize,

    metrics: PoolMetrics,
}

/// Hit/miss counters shared by the buffer and encoder pools
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Number of successful pool hits (buffer reused)
    pub hits: AtomicU64,

    /// Number of pool misses (new allocation required)
    pub misses: AtomicU64,

    /// Number of buffers returned to pool
    pub returns: AtomicU64,

    /// Number of buffers dropped (pool full, too small or too large)
    pub drops: AtomicU64,
}

impl PoolMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_drop(&self) {
        self.drops.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl PoolSnapshot {
    /// Calculate hit rate from snapshot (1.0 when nothing was requested)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl BufferPool {
    /// Create a pool with `pool_size` pre-allocated buffers of `buffer_capacity` bytes
    pub fn new(pool_size: usize, buffer_capacity: usize) -> Self {
        Self::with_max_retained(
            pool_size,
            buffer_capacity,
            DEFAULT_MAX_RETAINED.max(buffer_capacity),
        )
    }

    /// Create a pool that drops returned buffers larger than `max_retained`
    pub fn with_max_retained(pool_size: usize, buffer_capacity: usize, max_retained: usize) -> Self {
        // ArrayQueue rejects a zero capacity
        let queue = ArrayQueue::new(pool_size.max(1));

        for _ in 0..pool_size {
            let _ = queue.push(BytesMut::with_capacity(buffer_capacity));
        }

        Self {
            queue,
            buffer_capacity,
            max_retained,
            metrics: PoolMetrics::new(),
        }
    }

    /// Get a buffer from the pool, allocating if the pool is empty
    #[inline]
    pub fn get(&self) -> BytesMut {
        match self.queue.pop() {
            Some(buf) => {
                self.metrics.record_hit();
                buf
            }
            None => {
                self.metrics.record_miss();
                BytesMut::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Return a buffer to the pool
    ///
    /// The buffer is cleared first. Buffers below `buffer_capacity` (split
    /// remainders) or above `max_retained` are dropped, as are buffers that
    /// arrive while the pool is full.
    #[inline]
    pub fn put(&self, mut buf: BytesMut) {
        buf.clear();

        let capacity = buf.capacity();
        if capacity < self.buffer_capacity || capacity > self.max_retained {
            self.metrics.record_drop();
            return;
        }

        match self.queue.push(buf) {
            Ok(()) => self.metrics.record_return(),
            Err(_) => self.metrics.record_drop(),
        }
    }

    /// Number of buffers currently available in the pool
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of pooled buffers
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Capacity of each fresh buffer
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Largest buffer capacity kept on return
    #[inline]
    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_BUFFER_CAPACITY)
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("available", &self.available())
            .field("capacity", &self.capacity())
            .field("buffer_capacity", &self.buffer_capacity)
            .field("max_retained", &self.max_retained)
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_pool_test.rs"]
mod buffer_pool_test;
