//! Encoder instance pool
//!
//! An encode call needs a little mutable state: the configuration snapshot it
//! renders with and the line buffer it writes into. That state lives in an
//! [`EncoderInstance`] checked out of a lock-free free list for the duration of
//! one call. The [`Checkout`] guard owns the instance exclusively and resets it
//! on every exit path, so a reused instance never carries the previous line or
//! pins the previous sink's configuration.

use std::sync::Arc;

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

use crate::buffer_pool::{BufferPool, PoolMetrics};
use crate::config::EncoderConfig;

/// Default number of pooled encoder instances
pub const DEFAULT_INSTANCE_POOL_SIZE: usize = 64;

/// Per-call encoder state
#[derive(Debug, Default)]
pub struct EncoderInstance {
    config: Option<Arc<EncoderConfig>>,
    buf: BytesMut,
}

impl EncoderInstance {
    /// Configuration attached at checkout
    #[inline]
    pub fn config(&self) -> Option<&EncoderConfig> {
        self.config.as_deref()
    }

    /// Bytes written so far
    #[inline]
    pub fn buffer(&self) -> &BytesMut {
        &self.buf
    }

    /// True when no configuration is attached and no buffer is held
    pub fn is_reset(&self) -> bool {
        self.config.is_none() && self.buf.capacity() == 0
    }

    /// Drop the configuration reference and hand any held buffer back
    fn reset(&mut self, buffers: &BufferPool) {
        self.config = None;
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            buffers.put(buf);
        }
    }
}

/// Lock-free free list of encoder instances
///
/// `checkout` never blocks and never fails: an empty pool constructs a fresh
/// instance. Instances arriving while the pool is full are dropped.
pub struct EncoderPool {
    queue: ArrayQueue<Box<EncoderInstance>>,
    buffers: Arc<BufferPool>,
    metrics: PoolMetrics,
}

impl EncoderPool {
    /// Create a pool of `size` instances drawing line buffers from `buffers`
    pub fn new(size: usize, buffers: Arc<BufferPool>) -> Self {
        let queue = ArrayQueue::new(size.max(1));
        for _ in 0..size {
            let _ = queue.push(Box::default());
        }

        Self {
            queue,
            buffers,
            metrics: PoolMetrics::new(),
        }
    }

    /// Check out an instance bound to `config` with a fresh line buffer
    pub fn checkout(&self, config: &Arc<EncoderConfig>) -> Checkout<'_> {
        let mut instance = match self.queue.pop() {
            Some(instance) => {
                self.metrics.record_hit();
                instance
            }
            None => {
                self.metrics.record_miss();
                Box::default()
            }
        };

        instance.config = Some(Arc::clone(config));
        instance.buf = self.buffers.get();

        Checkout {
            instance: Some(instance),
            pool: self,
        }
    }

    /// Buffer pool backing the line buffers
    #[inline]
    pub fn buffers(&self) -> &Arc<BufferPool> {
        &self.buffers
    }

    /// Number of idle instances
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    fn check_in(&self, mut instance: Box<EncoderInstance>) {
        instance.reset(&self.buffers);
        match self.queue.push(instance) {
            Ok(()) => self.metrics.record_return(),
            Err(_) => self.metrics.record_drop(),
        }
    }
}

impl Default for EncoderPool {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE_POOL_SIZE, Arc::new(BufferPool::default()))
    }
}

impl std::fmt::Debug for EncoderPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderPool")
            .field("available", &self.available())
            .field("capacity", &self.capacity())
            .field("buffers", &self.buffers)
            .finish()
    }
}

/// Exclusive loan of one encoder instance, returned to the pool on drop
pub struct Checkout<'a> {
    instance: Option<Box<EncoderInstance>>,
    pool: &'a EncoderPool,
}

impl Checkout<'_> {
    /// Configuration and line buffer, borrowed together
    ///
    /// Always `Some` while the guard is alive.
    pub fn parts(&mut self) -> Option<(&EncoderConfig, &mut BytesMut)> {
        let instance = self.instance.as_deref_mut()?;
        let config = instance.config.as_deref()?;
        Some((config, &mut instance.buf))
    }

    /// Take the finished line, leaving the instance without a buffer
    pub fn take_buffer(&mut self) -> BytesMut {
        self.instance
            .as_deref_mut()
            .map(|instance| std::mem::take(&mut instance.buf))
            .unwrap_or_default()
    }

    /// The checked-out instance
    #[inline]
    pub fn instance(&self) -> Option<&EncoderInstance> {
        self.instance.as_deref()
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.pool.check_in(instance);
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
