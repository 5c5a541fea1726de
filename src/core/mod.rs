//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod global;
pub mod log_entry;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod severity;
pub mod standard;

pub use appender::Appender;
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use global::{global, standard_interface};
pub use log_entry::LogRecord;
pub use logger::{log_file_name, Logger, LoggerBuilder, DEFAULT_BASE_DIR};
pub use message::{render, Message};
pub use metrics::{LoggerMetrics, MetricKey, MetricsBridge, MetricsSnapshot, NoopMetrics};
pub use severity::{Severity, INVALID_LEVEL_NAME};
pub use standard::Printf;
