//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogRecord};

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
