//! Tests for the encoder instance pool

use super::*;
use std::thread;

fn pool(size: usize) -> EncoderPool {
    EncoderPool::new(size, Arc::new(BufferPool::new(4, 256)))
}

#[test]
fn test_checkout_attaches_config_and_buffer() {
    let pool = pool(2);
    let config = Arc::new(EncoderConfig::default());

    let mut checkout = pool.checkout(&config);
    let (cfg, buf) = checkout.parts().unwrap();
    assert_eq!(cfg.message_key, "msg");
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 256);

    assert_eq!(pool.available(), 1);
    assert_eq!(Arc::strong_count(&config), 2);
}

#[test]
fn test_drop_resets_and_returns_instance() {
    let pool = pool(1);
    let config = Arc::new(EncoderConfig::default());

    {
        let mut checkout = pool.checkout(&config);
        let (_, buf) = checkout.parts().unwrap();
        buf.extend_from_slice(b"\"info\",\"partial");
        // Dropped without taking the buffer, as on an early exit
    }

    assert_eq!(pool.available(), 1);
    assert_eq!(Arc::strong_count(&config), 1);
    // The partial line went back to the buffer pool, cleared
    assert_eq!(pool.buffers().available(), 4);

    let checkout = pool.checkout(&config);
    assert!(checkout.instance().unwrap().buffer().is_empty());
}

#[test]
fn test_take_buffer_leaves_instance_empty() {
    let pool = pool(1);
    let config = Arc::new(EncoderConfig::default());

    let line = {
        let mut checkout = pool.checkout(&config);
        checkout.parts().unwrap().1.extend_from_slice(b"line\n");
        let line = checkout.take_buffer();
        assert_eq!(checkout.instance().unwrap().buffer().capacity(), 0);
        line
    };

    assert_eq!(&line[..], b"line\n");
    // The taken buffer is still out on loan
    assert_eq!(pool.buffers().available(), 3);
    pool.buffers().put(line);
    assert_eq!(pool.buffers().available(), 4);
}

#[test]
fn test_returned_instances_are_reset() {
    let pool = pool(1);
    let config = Arc::new(EncoderConfig::default());

    drop(pool.checkout(&config));

    let idle = pool.queue.pop().unwrap();
    assert!(idle.is_reset());
}

#[test]
fn test_empty_pool_constructs_fresh_instances() {
    let pool = pool(1);
    let config = Arc::new(EncoderConfig::default());

    let first = pool.checkout(&config);
    let second = pool.checkout(&config);
    assert!(second.instance().unwrap().config().is_some());

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 1);

    drop(first);
    drop(second);

    // Only one slot, so the second return is dropped
    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.returns, 1);
    assert_eq!(snapshot.drops, 1);
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_concurrent_checkouts() {
    let pool = Arc::new(pool(4));
    let config = Arc::new(EncoderConfig::default());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let pool = Arc::clone(&pool);
            let config = Arc::clone(&config);
            thread::spawn(move || {
                for i in 0..500 {
                    let mut checkout = pool.checkout(&config);
                    let (_, buf) = checkout.parts().unwrap();
                    assert!(buf.is_empty());
                    buf.extend_from_slice(format!("{t}:{i}").as_bytes());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits + snapshot.misses, 2000);
    assert_eq!(Arc::strong_count(&config), 1);
}
