//! Rate-limited failure reporting
//!
//! A full disk makes every log call fail. Reporting each failure would flood
//! the diagnostics output, so failures are counted and reported at most once
//! per interval together with the number suppressed since the last report.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lumber_sinks::util::RateLimitedLogger;
//!
//! let reporter = RateLimitedLogger::new(Duration::from_secs(10));
//! let err = std::io::Error::other("disk full");
//!
//! assert!(reporter.error("app", "write failed", &err));
//! assert!(!reporter.error("app", "write failed", &err));
//! assert_eq!(reporter.total_error_count(), 2);
//! ```

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval between reports
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Bytes of a failed line included in a report
pub const MAX_DATA_LOG_LENGTH: usize = 256;

/// Counts failures and reports at most once per interval
#[derive(Debug)]
pub struct RateLimitedLogger {
    min_interval: Duration,

    last_log_time: Mutex<Option<Instant>>,

    /// Failures since the last report
    error_count: AtomicU64,

    total_errors: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_log_time: Mutex::new(None),
            error_count: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
        }
    }

    pub fn default_interval() -> Self {
        Self::new(DEFAULT_LOG_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    /// Record a failure of `sink`, reporting it if the interval has passed
    ///
    /// Returns true if the failure was reported, false if it was suppressed.
    pub fn error(&self, sink: &str, message: &str, error: &dyn Display) -> bool {
        let Some((suppressed, total)) = self.record() else {
            return false;
        };

        tracing::error!(
            sink = %sink,
            error = %error,
            suppressed,
            total_errors = total,
            "{message}"
        );
        true
    }

    /// Like [`error`](Self::error), including the start of the line that failed
    pub fn error_with_data(
        &self,
        sink: &str,
        message: &str,
        error: &dyn Display,
        data: &[u8],
    ) -> bool {
        let Some((suppressed, total)) = self.record() else {
            return false;
        };

        tracing::error!(
            sink = %sink,
            error = %error,
            data = %truncate(data),
            suppressed,
            total_errors = total,
            "{message}"
        );
        true
    }

    pub fn pending_error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn total_error_count(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.error_count.store(0, Ordering::Relaxed);
        self.total_errors.store(0, Ordering::Relaxed);
        *self.last_log_time.lock() = None;
    }

    /// Count one failure; when a report is due, return (suppressed, total)
    fn record(&self) -> Option<(u64, u64)> {
        self.error_count.fetch_add(1, Ordering::Relaxed);
        self.total_errors.fetch_add(1, Ordering::Relaxed);

        {
            let mut last_time = self.last_log_time.lock();
            let now = Instant::now();
            match *last_time {
                Some(last) if now.duration_since(last) < self.min_interval => return None,
                _ => *last_time = Some(now),
            }
        }

        let count = self.error_count.swap(0, Ordering::Relaxed);
        let total = self.total_errors.load(Ordering::Relaxed);
        Some((count.saturating_sub(1), total))
    }
}

impl Default for RateLimitedLogger {
    fn default() -> Self {
        Self::default_interval()
    }
}

fn truncate(data: &[u8]) -> String {
    if data.len() > MAX_DATA_LOG_LENGTH {
        format!(
            "{}... ({} bytes)",
            String::from_utf8_lossy(&data[..MAX_DATA_LOG_LENGTH]),
            data.len()
        )
    } else {
        String::from_utf8_lossy(data).into_owned()
    }
}
