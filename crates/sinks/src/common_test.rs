//! Tests for common sink types

use crate::{SinkError, SinkMetrics};

#[test]
fn test_metrics_new() {
    let snapshot = SinkMetrics::new().snapshot();

    assert_eq!(snapshot.lines_written, 0);
    assert_eq!(snapshot.bytes_written, 0);
    assert_eq!(snapshot.write_errors, 0);
    assert_eq!(snapshot.filtered, 0);
    assert_eq!(snapshot.flush_count, 0);
}

#[test]
fn test_metrics_line_written() {
    let metrics = SinkMetrics::new();

    metrics.line_written(120);
    metrics.line_written(80);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.lines_written, 2);
    assert_eq!(snapshot.bytes_written, 200);
}

#[test]
fn test_metrics_tracking() {
    let metrics = SinkMetrics::new();

    metrics.line_written(10);
    metrics.write_error();
    metrics.filtered();
    metrics.filtered();
    metrics.flush();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.lines_written, 1);
    assert_eq!(snapshot.write_errors, 1);
    assert_eq!(snapshot.filtered, 2);
    assert_eq!(snapshot.flush_count, 1);
}

#[test]
fn test_metrics_reset() {
    let metrics = SinkMetrics::new();
    metrics.line_written(10);
    metrics.write_error();

    metrics.reset();

    assert_eq!(metrics.snapshot(), Default::default());
}

#[test]
fn test_metrics_concurrent() {
    use std::sync::Arc;
    use std::thread;

    let metrics = Arc::new(SinkMetrics::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                for _ in 0..1000 {
                    metrics.line_written(3);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.lines_written, 4000);
    assert_eq!(snapshot.bytes_written, 12000);
}

#[test]
fn test_error_display() {
    let err = SinkError::too_large(2048, 1024);
    assert_eq!(err.to_string(), "write length 2048 exceeds maximum file size 1024");

    let err = SinkError::compression("app-2025.log", "disk full");
    assert!(err.to_string().contains("app-2025.log"));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: SinkError = io.into();
    assert!(matches!(err, SinkError::Io(_)));
    assert!(err.to_string().contains("denied"));
}
