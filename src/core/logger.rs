//! Main logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    log_entry::LogRecord,
    message::Message,
    metrics::{LoggerMetrics, MetricKey, MetricsBridge},
    severity::{Severity, INVALID_LEVEL_NAME},
    standard::Printf,
};
use crate::appenders::console::ConsoleAppender;
use crate::appenders::rotating_file::{create_log_dir, RotatingFileAppender, RotationPolicy};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Directory used when no base directory is given
pub const DEFAULT_BASE_DIR: &str = "/var/moonfrog/go/";

struct FileSink {
    path: PathBuf,
    appender: RotatingFileAppender,
}

/// Leveled logger writing to a rotated file and, optionally, the console
///
/// One instance is meant to be built at startup and shared (by reference or
/// `Arc`) with everything that logs. Configuration calls may race with log
/// calls without data races; each sink is written under its own lock so lines
/// never interleave.
///
/// # Example
///
/// ```
/// use leveled_logs::{infof, Logger};
///
/// let logger = Logger::new();
/// logger.set_level("debug");
/// assert_eq!(logger.level(), "debug");
///
/// // No sink bound yet: the call is a silent no-op
/// infof!(logger, "listening on {}", 8080);
/// ```
pub struct Logger {
    level: RwLock<Severity>,
    console_enabled: AtomicBool,
    file_sink: Mutex<Option<FileSink>>,
    console_sink: Mutex<Box<dyn Appender>>,
    metrics: Arc<dyn MetricsBridge>,
}

impl Logger {
    /// Logger at INFO with no file sink, console logging off and in-process
    /// counters
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: RwLock::new(Severity::Info),
            console_enabled: AtomicBool::new(false),
            file_sink: Mutex::new(None),
            console_sink: Mutex::new(Box::new(ConsoleAppender::new())),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    // ------------------------------------------------------------------
    // File sink lifecycle
    // ------------------------------------------------------------------

    /// Bind the file sink under [`DEFAULT_BASE_DIR`]
    pub fn init_default(&self, app_name: &str) {
        self.init(app_name, DEFAULT_BASE_DIR);
    }

    /// Bind the file sink at `<base_dir>/<app_name>.log` with the default
    /// rotation policy
    ///
    /// Failures are reported on stderr and leave the logger without a file
    /// sink; logging keeps working on the console.
    pub fn init(&self, app_name: &str, base_dir: impl AsRef<Path>) {
        if let Err(e) = self.try_init(app_name, base_dir) {
            eprintln!("[LOGGER ERROR] could not create log directory. ({})", e);
        }
    }

    /// Like [`init`](Self::init) but returns the failure instead of printing it
    ///
    /// On success the path of the bound log file is returned.
    pub fn try_init(&self, app_name: &str, base_dir: impl AsRef<Path>) -> Result<PathBuf> {
        self.init_with_policy(app_name, base_dir, RotationPolicy::default())
    }

    /// Bind the file sink with an explicit rotation policy
    ///
    /// An empty `base_dir` means [`DEFAULT_BASE_DIR`]. The previously bound
    /// sink, if any, is replaced.
    pub fn init_with_policy(
        &self,
        app_name: &str,
        base_dir: impl AsRef<Path>,
        policy: RotationPolicy,
    ) -> Result<PathBuf> {
        let base_dir = base_dir_or_default(base_dir.as_ref());

        create_log_dir(base_dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                format!("cannot create '{}'", base_dir.display()),
                e,
            )
        })?;

        let path = base_dir.join(log_file_name(app_name));
        let appender = RotatingFileAppender::new(&path, policy);
        *self.file_sink.lock() = Some(FileSink {
            path: path.clone(),
            appender,
        });
        Ok(path)
    }

    /// Path of the bound log file, if any
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file_sink.lock().as_ref().map(|sink| sink.path.clone())
    }

    // ------------------------------------------------------------------
    // Level gate and console switch
    // ------------------------------------------------------------------

    /// Set the minimum level from its name
    ///
    /// Accepts exactly `debug`, `info`, `warn` or `error`. Anything else
    /// selects `info` and logs a notice about the rejected name.
    #[track_caller]
    pub fn set_level(&self, name: &str) {
        match name.parse::<Severity>() {
            Ok(severity) => *self.level.write() = severity,
            Err(_) => {
                *self.level.write() = Severity::Info;
                self.infof(format_args!("wrong level {}: default info", name));
            }
        }
    }

    /// Name of the current minimum level
    pub fn level(&self) -> &'static str {
        self.severity().threshold_name().unwrap_or(INVALID_LEVEL_NAME)
    }

    /// Current minimum level
    pub fn severity(&self) -> Severity {
        *self.level.read()
    }

    /// Whether a call at `severity` would be emitted
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity.passes(*self.level.read())
    }

    pub fn set_console_logging(&self, enabled: bool) {
        self.console_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn console_logging(&self) -> bool {
        self.console_enabled.load(Ordering::Relaxed)
    }

    pub fn metrics(&self) -> &Arc<dyn MetricsBridge> {
        &self.metrics
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Render `message` at `severity` and write it to the active sinks
    ///
    /// No metrics are touched. Calls below the minimum level, or with no
    /// active sink, do nothing.
    #[track_caller]
    pub fn log<'a>(&self, severity: Severity, message: impl Into<Message<'a>>) {
        if !self.is_enabled(severity) {
            return;
        }
        self.dispatch(severity, message.into(), Location::caller());
    }

    fn dispatch(&self, severity: Severity, message: Message<'_>, location: &'static Location<'static>) {
        let console = self.console_logging();
        if !console && self.file_sink.lock().is_none() {
            return;
        }

        // Rendered outside the sink locks: Display impls may log themselves
        let record = LogRecord::new(severity, message.render(severity), location);

        if let Some(sink) = self.file_sink.lock().as_mut() {
            if let Err(e) = sink.appender.append(&record) {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", sink.appender.name(), e);
            }
        }

        if console {
            let mut console_sink = self.console_sink.lock();
            if let Err(e) = console_sink.append(&record) {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", console_sink.name(), e);
            }
        }
    }

    /// Flush both sinks
    pub fn flush(&self) -> Result<()> {
        if let Some(sink) = self.file_sink.lock().as_mut() {
            sink.appender.flush()?;
        }
        self.console_sink.lock().flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Severity entry points
    // ------------------------------------------------------------------

    #[inline]
    #[track_caller]
    pub fn debugf<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn infof<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Info, message);
    }

    /// Log at WARN and count it under `RSTAT_WARN`
    #[track_caller]
    pub fn warnf<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Warn, message);
        self.metrics.increment(MetricKey::Warn);
    }

    /// Log at WARN without touching the counters
    #[inline]
    #[track_caller]
    pub fn warnf_silent<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Warn, message);
    }

    /// Log at ERROR and count it under `RSTAT_ERROR`
    #[track_caller]
    pub fn errorf<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Error, message);
        self.metrics.increment(MetricKey::Error);
    }

    /// Log at ERROR without touching the counters
    #[inline]
    #[track_caller]
    pub fn errorf_silent<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Severity::Error, message);
    }

    /// Log at PANIC, count it under `RSTAT_PANIC` and hand back the error the
    /// caller is expected to propagate
    ///
    /// ```
    /// use leveled_logs::{Logger, LoggerError};
    ///
    /// fn load(logger: &Logger) -> Result<(), LoggerError> {
    ///     Err(logger.panicf(format_args!("boom")))
    /// }
    ///
    /// let err = load(&Logger::new()).unwrap_err();
    /// assert_eq!(err.to_string(), "boom");
    /// ```
    #[must_use = "the returned error carries the panic and must be propagated or handled"]
    #[track_caller]
    pub fn panicf<'a>(&self, message: impl Into<Message<'a>>) -> LoggerError {
        let message = message.into();
        self.log(Severity::Panic, message);
        self.metrics.increment(MetricKey::Panic);
        LoggerError::panic(message.text())
    }

    /// [`panicf`](Self::panicf) without touching the counters
    #[must_use = "the returned error carries the panic and must be propagated or handled"]
    #[track_caller]
    pub fn panicf_silent<'a>(&self, message: impl Into<Message<'a>>) -> LoggerError {
        let message = message.into();
        self.log(Severity::Panic, message);
        LoggerError::panic(message.text())
    }

    /// Log at FATAL, print a stack trace and exit the process with status 1
    #[track_caller]
    pub fn fatalf<'a>(&self, message: impl Into<Message<'a>>) -> ! {
        self.log(Severity::Fatal, message);
        eprintln!("{}", std::backtrace::Backtrace::force_capture());
        let _ = self.flush();
        std::process::exit(1)
    }

    /// This logger as a bare printf-style capability
    pub fn standard_interface(&self) -> &dyn Printf {
        self
    }
}

fn base_dir_or_default(base_dir: &Path) -> &Path {
    if base_dir.as_os_str().is_empty() {
        Path::new(DEFAULT_BASE_DIR)
    } else {
        base_dir
    }
}

/// `<app_name>.log`, or `<unix nanos>.log` for an empty name
pub fn log_file_name(app_name: &str) -> String {
    if app_name.is_empty() {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{}.log", nanos)
    } else {
        format!("{}.log", app_name)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Printf for Logger {
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>) {
        self.infof(args);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.severity())
            .field("console_enabled", &self.console_logging())
            .field("file_path", &self.file_path())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use leveled_logs::prelude::*;
/// use std::sync::Arc;
///
/// let metrics = Arc::new(LoggerMetrics::new());
/// let logger = Logger::builder()
///     .level("warn")
///     .console(true)
///     .metrics(metrics.clone())
///     .build();
///
/// assert_eq!(logger.level(), "warn");
/// assert!(logger.console_logging());
/// ```
pub struct LoggerBuilder {
    level: String,
    console: bool,
    console_sink: Option<Box<dyn Appender>>,
    metrics: Option<Arc<dyn MetricsBridge>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: "info".to_string(),
            console: false,
            console_sink: None,
            metrics: None,
        }
    }

    /// Set the minimum level by name, with [`Logger::set_level`] semantics
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, name: impl Into<String>) -> Self {
        self.level = name.into();
        self
    }

    /// Enable or disable console mirroring
    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Replace the stdout console sink
    #[must_use = "builder methods return a new value"]
    pub fn console_sink<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.console_sink = Some(Box::new(appender));
        self
    }

    /// Report warn/error/panic counts to `metrics`
    #[must_use = "builder methods return a new value"]
    pub fn metrics(mut self, metrics: Arc<dyn MetricsBridge>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the Logger
    #[track_caller]
    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        if let Some(sink) = self.console_sink {
            logger.console_sink = Mutex::new(sink);
        }
        if let Some(metrics) = self.metrics {
            logger.metrics = metrics;
        }
        logger.set_console_logging(self.console);
        logger.set_level(&self.level);
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
