//! Alerting counters for warn/error/panic occurrences
//!
//! The logger reports every non-silent WARN, ERROR and PANIC call to a
//! [`MetricsBridge`]. The bridge is fire-and-forget: the logger never looks at
//! a result. [`LoggerMetrics`] is the in-process default; applications that
//! ship counters elsewhere implement the trait on their own client.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter keys understood by the metrics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKey {
    #[serde(rename = "RSTAT_WARN")]
    Warn,
    #[serde(rename = "RSTAT_ERROR")]
    Error,
    #[serde(rename = "RSTAT_PANIC")]
    Panic,
}

impl MetricKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Warn => "RSTAT_WARN",
            MetricKey::Error => "RSTAT_ERROR",
            MetricKey::Panic => "RSTAT_PANIC",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for counter increments
pub trait MetricsBridge: Send + Sync {
    fn increment(&self, key: MetricKey);
}

/// In-process counters
///
/// # Example
///
/// ```
/// use leveled_logs::{LoggerMetrics, MetricKey, MetricsBridge};
///
/// let metrics = LoggerMetrics::new();
/// metrics.increment(MetricKey::Warn);
/// metrics.increment(MetricKey::Warn);
///
/// assert_eq!(metrics.warn_count(), 2);
/// assert_eq!(metrics.error_count(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    warn: AtomicU64,
    error: AtomicU64,
    panic: AtomicU64,
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub warn: u64,
    pub error: u64,
    pub panic: u64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            warn: AtomicU64::new(0),
            error: AtomicU64::new(0),
            panic: AtomicU64::new(0),
        }
    }

    fn counter(&self, key: MetricKey) -> &AtomicU64 {
        match key {
            MetricKey::Warn => &self.warn,
            MetricKey::Error => &self.error,
            MetricKey::Panic => &self.panic,
        }
    }

    #[inline]
    pub fn count(&self, key: MetricKey) -> u64 {
        self.counter(key).load(Ordering::Relaxed)
    }

    #[inline]
    pub fn warn_count(&self) -> u64 {
        self.count(MetricKey::Warn)
    }

    #[inline]
    pub fn error_count(&self) -> u64 {
        self.count(MetricKey::Error)
    }

    #[inline]
    pub fn panic_count(&self) -> u64 {
        self.count(MetricKey::Panic)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            warn: self.warn_count(),
            error: self.error_count(),
            panic: self.panic_count(),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.warn.store(0, Ordering::Relaxed);
        self.error.store(0, Ordering::Relaxed);
        self.panic.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsBridge for LoggerMetrics {
    #[inline]
    fn increment(&self, key: MetricKey) {
        self.counter(key).fetch_add(1, Ordering::Relaxed);
    }
}

/// Bridge that discards every increment
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsBridge for NoopMetrics {
    fn increment(&self, _key: MetricKey) {}
}
