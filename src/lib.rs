//! # Leveled Logs
//!
//! Leveled logging to a size- and age-rotated file, with optional console
//! mirroring and warn/error/panic counters for alerting.
//!
//! ## Features
//!
//! - **Level gate**: `debug < info < warn < error < panic < fatal`
//! - **Rotating file sink**: 500 MB / 10 backups / 28 days by default
//! - **Console mirror**: the same lines on stdout, switchable at runtime
//! - **Alerting counters**: `RSTAT_WARN`, `RSTAT_ERROR`, `RSTAT_PANIC`
//! - **Printf capability**: a one-method trait for components that only need
//!   to log
//!
//! ```no_run
//! use leveled_logs::{errorf, infof, values, Logger};
//!
//! let logger = Logger::new();
//! logger.init_default("billing");
//! logger.set_level("debug");
//!
//! infof!(logger, "started with {} workers", 8);
//! logger.warnf(values!("queue depth", 120));
//! errorf!(logger, "payment {} failed", "p-17");
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        global, Appender, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        Message, MetricKey, MetricsBridge, Printf, Result, Severity,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    global, log_file_name, render, standard_interface, Appender, LogRecord, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Message, MetricKey, MetricsBridge,
    MetricsSnapshot, NoopMetrics, Printf, Result, Severity, DEFAULT_BASE_DIR,
    INVALID_LEVEL_NAME,
};
