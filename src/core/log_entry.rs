//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Local};
use std::panic::Location;
use std::path::Path;

/// Date/time layout of the line prefix: `2024/05/01 13:45:07`
pub const PREFIX_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A rendered log call, ready to be written by an appender
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    /// Rendered message, `[LABEL]` tag included
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub file: &'static str,
    pub line: u32,
}

impl LogRecord {
    pub fn new(severity: Severity, message: String, location: &'static Location<'static>) -> Self {
        Self {
            severity,
            message,
            timestamp: Local::now(),
            file: location.file(),
            line: location.line(),
        }
    }

    /// File name of the call site without its directories
    pub fn short_file(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.file)
    }

    /// `<date> <time> <file:line>: `
    pub fn prefix(&self) -> String {
        format!(
            "{} {}:{}: ",
            self.timestamp.format(PREFIX_TIME_FORMAT),
            self.short_file(),
            self.line
        )
    }

    /// Complete output line, terminated by exactly one newline
    pub fn to_line(&self) -> String {
        let mut line = self.prefix();
        line.push_str(&self.message);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}
