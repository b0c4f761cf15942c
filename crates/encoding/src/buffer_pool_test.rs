//! Tests for the lock-free buffer pool

use crate::buffer_pool::{BufferPool, DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_SIZE};
use bytes::BytesMut;
use std::sync::Arc;
use std::thread;

#[test]
fn test_new_pool() {
    let pool = BufferPool::new(10, 1024);

    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.available(), 10);
    assert_eq!(pool.buffer_capacity(), 1024);
    assert!(!pool.is_empty());
    assert!(pool.is_full());
}

#[test]
fn test_default_pool() {
    let pool = BufferPool::default();
    assert_eq!(pool.capacity(), DEFAULT_POOL_SIZE);
    assert_eq!(pool.buffer_capacity(), DEFAULT_BUFFER_CAPACITY);
}

#[test]
fn test_get_from_empty_pool_allocates() {
    let pool = BufferPool::new(2, 1024);

    let _b1 = pool.get();
    let _b2 = pool.get();
    assert!(pool.is_empty());

    // Never blocks or fails
    let b3 = pool.get();
    assert!(b3.capacity() >= 1024);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits, 2);
    assert_eq!(snapshot.misses, 1);
    assert!((snapshot.hit_rate() - 0.666).abs() < 0.01);
}

#[test]
fn test_put_clears_buffer() {
    let pool = BufferPool::new(1, 1024);

    let mut buf = pool.get();
    buf.extend_from_slice(b"\"info\",\"stale line\"\n");
    pool.put(buf);

    let buf2 = pool.get();
    assert!(buf2.is_empty());
    assert_eq!(pool.metrics().snapshot().returns, 1);
}

#[test]
fn test_put_drops_when_pool_full() {
    let pool = BufferPool::new(2, 1024);
    assert!(pool.is_full());

    pool.put(BytesMut::with_capacity(1024));

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.drops, 1);
    assert_eq!(pool.available(), 2);
}

#[test]
fn test_put_drops_small_buffers() {
    let pool = BufferPool::new(5, 1024);
    let _buf = pool.get();

    pool.put(BytesMut::with_capacity(100));

    assert_eq!(pool.metrics().snapshot().drops, 1);
    assert_eq!(pool.available(), 4);
}

#[test]
fn test_put_drops_oversized_buffers() {
    let pool = BufferPool::with_max_retained(4, 64, 256);
    let mut buf = pool.get();
    buf.extend_from_slice(&[b'x'; 4096]);
    assert!(buf.capacity() > 256);

    pool.put(buf);

    assert_eq!(pool.available(), 3);
    assert_eq!(pool.metrics().snapshot().drops, 1);
}

#[test]
fn test_zero_sized_pool_still_serves() {
    let pool = BufferPool::new(0, 128);
    assert!(pool.is_empty());
    let buf = pool.get();
    assert!(buf.capacity() >= 128);
}

#[test]
fn test_concurrent_get_put() {
    let pool = Arc::new(BufferPool::new(8, 256));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for i in 0..1000 {
                    let mut buf = pool.get();
                    buf.extend_from_slice(format!("{t}:{i}").as_bytes());
                    pool.put(buf);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits + snapshot.misses, 4000);
    assert_eq!(snapshot.returns + snapshot.drops, 4000);
    assert!(pool.available() <= 8);
}
