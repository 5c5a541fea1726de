//! Integration tests for the logger
//!
//! These tests verify:
//! - File sink lifecycle (init, nested directories, generated names, re-init)
//! - Line layout written to the file
//! - Console-only fallback when the directory cannot be created
//! - Metrics on the non-silent entry points
//! - The printf capability

use leveled_logs::appenders::{ConsoleAppender, RotationPolicy, SharedBuffer};
use leveled_logs::{errorf, infof, values, warnf, Logger, LoggerMetrics, Printf, Severity};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn console_logger(level: &str) -> (Logger, SharedBuffer, Arc<LoggerMetrics>) {
    let buffer = SharedBuffer::new();
    let metrics = Arc::new(LoggerMetrics::new());
    let logger = Logger::builder()
        .level(level)
        .console(true)
        .console_sink(ConsoleAppender::with_writer(buffer.clone()))
        .metrics(metrics.clone())
        .build();
    (logger, buffer, metrics)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_init_writes_app_named_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();

    logger.init("svc", temp_dir.path());
    let path = logger.file_path().expect("file sink should be bound");
    assert_eq!(path, temp_dir.path().join("svc.log"));

    let line = line!() + 1;
    infof!(logger, "count={}", 5);
    logger.flush().expect("Failed to flush");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    let expected = format!("integration_tests.rs:{}: [INFO] count=5", line);
    assert!(lines[0].ends_with(&expected), "{}", lines[0]);
}

#[test]
fn test_line_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();
    let path = logger.try_init("layout", temp_dir.path()).expect("init failed");

    logger.warnf(values!(42));
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    assert!(content.ends_with(": [WARN] 42\n"));
    assert!(!content.ends_with("\n\n"), "value form must not double the newline");

    // "YYYY/MM/DD HH:MM:SS integration_tests.rs:NN: [WARN] 42"
    let line = content.lines().next().unwrap();
    let mut fields = line.splitn(4, ' ');
    let date = fields.next().unwrap();
    let time = fields.next().unwrap();
    let location = fields.next().unwrap();
    assert_eq!(date.len(), 10);
    assert_eq!(date.matches('/').count(), 2);
    assert_eq!(time.len(), 8);
    assert_eq!(time.matches(':').count(), 2);
    assert!(location.starts_with("integration_tests.rs:"));
    assert!(location.ends_with(':'));
}

#[test]
fn test_init_creates_nested_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let base = temp_dir.path().join("a").join("b");
    let logger = Logger::new();

    logger.init("nested", &base);
    assert!(base.is_dir());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&base).unwrap().permissions().mode() & 0o777;
        // umask can only remove bits
        assert_eq!(mode & !0o755, 0);
    }
}

#[test]
fn test_empty_app_name_uses_nanosecond_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();

    let first = logger.try_init("", temp_dir.path()).expect("init failed");
    let second = logger.try_init("", temp_dir.path()).expect("init failed");

    for path in [&first, &second] {
        let name = path.file_name().unwrap().to_str().unwrap();
        let stem = name.strip_suffix(".log").expect("should end in .log");
        assert!(stem.parse::<u128>().is_ok(), "not a timestamp: {}", name);
    }
    assert_ne!(first, second);
}

#[test]
fn test_reinit_replaces_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();

    logger.init("first", temp_dir.path());
    infof!(logger, "to first");
    logger.init("second", temp_dir.path());
    infof!(logger, "to second");
    logger.flush().expect("Failed to flush");

    let first = read_lines(&temp_dir.path().join("first.log"));
    let second = read_lines(&temp_dir.path().join("second.log"));
    assert_eq!(first.len(), 1);
    assert!(first[0].ends_with("[INFO] to first"));
    assert_eq!(second.len(), 1);
    assert!(second[0].ends_with("[INFO] to second"));
}

#[test]
fn test_directory_failure_falls_back_to_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, "regular file").unwrap();

    let (logger, buffer, _) = console_logger("info");
    assert!(logger.try_init("svc", &blocker).is_err());

    logger.init("svc", &blocker);
    assert!(logger.file_path().is_none());

    infof!(logger, "still here");
    assert!(buffer.contents().ends_with("[INFO] still here\n"));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "regular file");
}

#[test]
fn test_no_sink_is_a_silent_noop() {
    let logger = Logger::new();
    infof!(logger, "nowhere");
    errorf!(logger, "nowhere either");
    logger.flush().expect("flush without sinks should succeed");
}

#[test]
fn test_file_and_console_receive_same_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, buffer, _) = console_logger("info");
    let path = logger.try_init("both", temp_dir.path()).expect("init failed");

    errorf!(logger, "disk {} failed", "sda");
    logger.flush().expect("Failed to flush");

    let file_content = fs::read_to_string(&path).unwrap();
    // Timestamps may straddle a second boundary; compare from the location on
    let tail = |s: &str| s.splitn(3, ' ').nth(2).unwrap().to_string();
    assert_eq!(tail(&file_content), tail(&buffer.contents()));
}

#[test]
fn test_console_toggle() {
    let (logger, buffer, _) = console_logger("info");
    logger.set_console_logging(false);
    infof!(logger, "hidden");
    logger.set_console_logging(true);
    infof!(logger, "shown");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[INFO] shown"));
}

#[test]
fn test_silent_variants_match_but_do_not_count() {
    let (loud, loud_out, loud_metrics) = console_logger("debug");
    let (quiet, quiet_out, quiet_metrics) = console_logger("debug");

    loud.warnf(format_args!("w {}", 1));
    loud.errorf(format_args!("e {}", 2));
    quiet.warnf_silent(format_args!("w {}", 1));
    quiet.errorf_silent(format_args!("e {}", 2));

    let strip = |lines: Vec<String>| -> Vec<String> {
        lines
            .into_iter()
            .map(|l| l.split(": ").skip(1).collect::<Vec<_>>().join(": "))
            .collect()
    };
    assert_eq!(strip(loud_out.lines()), strip(quiet_out.lines()));

    assert_eq!(loud_metrics.warn_count(), 1);
    assert_eq!(loud_metrics.error_count(), 1);
    assert_eq!(quiet_metrics.warn_count(), 0);
    assert_eq!(quiet_metrics.error_count(), 0);
}

#[test]
fn test_metric_per_call() {
    let (logger, _, metrics) = console_logger("info");
    for i in 0..5 {
        warnf!(logger, "warn {}", i);
    }
    for i in 0..3 {
        errorf!(logger, "error {}", i);
    }
    assert_eq!(metrics.warn_count(), 5);
    assert_eq!(metrics.error_count(), 3);
}

#[test]
fn test_panic_severity() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let metrics = Arc::new(LoggerMetrics::new());
    let logger = Logger::builder().metrics(metrics.clone()).build();
    let path = logger.try_init("panic", temp_dir.path()).expect("init failed");

    let err = logger.panicf(format_args!("boom"));
    logger.flush().expect("Failed to flush");

    assert!(err.is_panic());
    assert!(err.to_string().contains("boom"));
    assert!(fs::read_to_string(&path).unwrap().ends_with("[PANIC] boom\n"));
    assert_eq!(metrics.panic_count(), 1);
}

#[test]
fn test_panic_with_value_list() {
    let (logger, buffer, _) = console_logger("info");
    let err = logger.panicf(values!("lost", 3, "shards"));

    assert_eq!(err.to_string(), "lost 3 shards");
    assert!(buffer.contents().ends_with("[PANIC] lost 3 shards\n"));
}

#[test]
fn test_set_level_bogus() {
    let (logger, buffer, _) = console_logger("error");
    logger.set_level("bogus");

    assert_eq!(logger.level(), "info");
    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[INFO] wrong level bogus: default info"));
}

#[test]
fn test_set_level_names() {
    let logger = Logger::new();
    for name in ["debug", "info", "warn", "error"] {
        logger.set_level(name);
        assert_eq!(logger.level(), name);
    }
    logger.set_level("ERROR");
    assert_eq!(logger.level(), "info");
    assert_eq!(logger.severity(), Severity::Info);
}

#[test]
fn test_printf_capability() {
    struct Worker<'a> {
        log: &'a dyn Printf,
    }

    impl Worker<'_> {
        fn run(&self) {
            self.log.printf(format_args!("worker finished {} tasks", 12));
        }
    }

    let (logger, buffer, _) = console_logger("info");
    Worker { log: logger.standard_interface() }.run();
    assert!(buffer.contents().ends_with("[INFO] worker finished 12 tasks\n"));

    let shared: Arc<dyn Printf> = Arc::new(logger);
    shared.printf(format_args!("via arc"));
    assert!(buffer.contents().ends_with("[INFO] via arc\n"));
}

#[test]
fn test_rotation_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::new();
    let policy = RotationPolicy::new(1, 2, 0).with_max_bytes(200);
    let path = logger
        .init_with_policy("rolling", temp_dir.path(), policy)
        .expect("init failed");

    for i in 0..40 {
        infof!(logger, "message number {}", i);
    }
    logger.flush().expect("Failed to flush");

    let files: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    let backups = files.iter().filter(|n| n.starts_with("rolling-")).count();
    assert!(backups >= 1, "expected a rotated backup, found {:?}", files);
    assert!(backups <= 2, "retention exceeded: {:?}", files);
    assert!(fs::metadata(&path).unwrap().len() <= 200);
}
