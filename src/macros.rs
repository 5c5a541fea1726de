//! Logging macros for ergonomic log message formatting.
//!
//! The `*f!` macros take a `format!`-style template and forward it to the
//! matching [`Logger`](crate::Logger) method. [`values!`] builds the
//! alternative value-list form, which is joined by spaces and never
//! interpreted as a template.
//!
//! # Examples
//!
//! ```
//! use leveled_logs::prelude::*;
//! use leveled_logs::{infof, values, warnf};
//!
//! let logger = Logger::new();
//!
//! // Template with arguments: "[INFO] listening on port 8080"
//! let port = 8080;
//! infof!(logger, "listening on port {}", port);
//!
//! // Value list: "[WARN] retry 3 of 5\n"
//! logger.warnf(values!("retry", 3, "of", 5));
//!
//! // Macros work on any expression that derefs to a Logger
//! let shared = std::sync::Arc::new(Logger::new());
//! warnf!(shared, "disk at {}%", 91);
//! ```

/// Build a [`Message::Values`](crate::Message::Values) from any `Display`
/// values.
///
/// # Examples
///
/// ```
/// use leveled_logs::{render, values, Severity};
///
/// assert_eq!(render(Severity::Info, values!(42)), "[INFO] 42\n");
/// assert_eq!(render(Severity::Info, values!("a", 1, 'b')), "[INFO] a 1 b\n");
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),+ $(,)?) => {
        $crate::Message::Values(&[$(&$value as &dyn ::core::fmt::Display),+])
    };
}

/// Log a message at an explicit severity, without metrics.
///
/// # Examples
///
/// ```
/// # use leveled_logs::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logs::logf;
/// logf!(logger, Severity::Info, "Simple message");
/// logf!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logs::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_level("debug");
/// use leveled_logs::debugf;
/// debugf!(logger, "Entering function: calculate()");
/// debugf!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(format_args!($($arg)+))
    };
}

/// Log a warning and count it under `RSTAT_WARN`.
///
/// # Examples
///
/// ```
/// # use leveled_logs::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logs::warnf;
/// warnf!(logger, "Low disk space");
/// warnf!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(format_args!($($arg)+))
    };
}

/// Log a warning without counting it.
#[macro_export]
macro_rules! warnf_silent {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf_silent(format_args!($($arg)+))
    };
}

/// Log an error and count it under `RSTAT_ERROR`.
///
/// # Examples
///
/// ```
/// # use leveled_logs::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logs::errorf;
/// errorf!(logger, "Failed to connect to database");
/// errorf!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(format_args!($($arg)+))
    };
}

/// Log an error without counting it.
#[macro_export]
macro_rules! errorf_silent {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf_silent(format_args!($($arg)+))
    };
}

/// Log at PANIC and evaluate to the [`LoggerError`](crate::LoggerError) to
/// propagate.
///
/// # Examples
///
/// ```
/// # use leveled_logs::prelude::*;
/// use leveled_logs::panicf;
///
/// fn parse(logger: &Logger, input: &str) -> Result<u32> {
///     input.parse().map_err(|_| panicf!(logger, "unparsable input {:?}", input))
/// }
///
/// let logger = Logger::new();
/// assert!(parse(&logger, "x").unwrap_err().is_panic());
/// ```
#[macro_export]
macro_rules! panicf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf(format_args!($($arg)+))
    };
}

/// [`panicf!`] without counting the occurrence.
#[macro_export]
macro_rules! panicf_silent {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf_silent(format_args!($($arg)+))
    };
}

/// Log at FATAL, print a stack trace and exit the process.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::{ConsoleAppender, SharedBuffer};
    use crate::core::{Logger, LoggerMetrics, Severity};
    use std::sync::Arc;

    fn capturing() -> (Logger, SharedBuffer, Arc<LoggerMetrics>) {
        let buffer = SharedBuffer::new();
        let metrics = Arc::new(LoggerMetrics::new());
        let logger = Logger::builder()
            .level("debug")
            .console(true)
            .console_sink(ConsoleAppender::with_writer(buffer.clone()))
            .metrics(metrics.clone())
            .build();
        (logger, buffer, metrics)
    }

    #[test]
    fn test_logf_macro() {
        let (logger, buffer, _) = capturing();
        logf!(logger, Severity::Info, "Formatted: {}", 42);
        assert!(buffer.contents().ends_with("[INFO] Formatted: 42\n"));
    }

    #[test]
    fn test_level_macros() {
        let (logger, buffer, metrics) = capturing();
        debugf!(logger, "Count: {}", 5);
        infof!(logger, "Items: {}", 100);
        warnf!(logger, "Retry {} of {}", 1, 3);
        errorf!(logger, "Code: {}", 500);
        warnf_silent!(logger, "quiet warn");
        errorf_silent!(logger, "quiet error");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].ends_with("[DEBUG] Count: 5"));
        assert!(lines[1].ends_with("[INFO] Items: 100"));
        assert!(lines[2].ends_with("[WARN] Retry 1 of 3"));
        assert!(lines[3].ends_with("[ERROR] Code: 500"));
        assert_eq!(metrics.warn_count(), 1);
        assert_eq!(metrics.error_count(), 1);
    }

    #[test]
    fn test_panic_macros() {
        let (logger, buffer, metrics) = capturing();
        let err = panicf!(logger, "boom {}", 1);
        assert_eq!(err.to_string(), "boom 1");
        let err = panicf_silent!(logger, "boom {}", 2);
        assert_eq!(err.to_string(), "boom 2");

        assert_eq!(metrics.panic_count(), 1);
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_values_macro() {
        let (logger, buffer, _) = capturing();
        let name = String::from("worker-1");
        logger.infof(values!(name, 7, "{}"));
        assert!(buffer.contents().ends_with("[INFO] worker-1 7 {}\n"));
    }
}
