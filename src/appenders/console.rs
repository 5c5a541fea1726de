//! Console appender implementation

use crate::core::{Appender, LogRecord, LoggerError, Result};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Writes log lines to stdout, or to any injected writer
pub struct ConsoleAppender {
    target: Box<dyn Write + Send + Sync>,
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Write to `writer` instead of stdout
    pub fn with_writer<W: Write + Send + Sync + 'static>(writer: W) -> Self {
        Self {
            target: Box::new(writer),
            use_colors: false,
        }
    }

    /// Colour the `[LEVEL]` tag with ANSI escapes
    ///
    /// Off by default so that console output stays byte-identical to the file
    /// output.
    ///
    /// # Example
    ///
    /// ```
    /// use leveled_logs::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::new().with_colors(true);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn format_line(&self, record: &LogRecord) -> String {
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                use colored::Colorize;
                let tag = format!("[{}]", record.severity.label());
                if let Some(rest) = record.message.strip_prefix(&tag) {
                    let mut line = record.prefix();
                    line.push_str(&tag.color(record.severity.color_code()).to_string());
                    line.push_str(rest);
                    if !line.ends_with('\n') {
                        line.push('\n');
                    }
                    return line;
                }
            }
        }
        record.to_line()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format_line(record);
        self.target
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing to console", "write failed", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.target.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Shared in-memory writer, handy for capturing console output
///
/// ```
/// use leveled_logs::appenders::{ConsoleAppender, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let appender = ConsoleAppender::with_writer(buffer.clone());
/// assert!(buffer.contents().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Written lines, without their terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
