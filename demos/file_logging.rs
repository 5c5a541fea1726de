//! File logging example
//!
//! Demonstrates the rotating file sink, the console mirror, the level gate,
//! the alerting counters and PANIC as a returned error.
//!
//! Run with: cargo run --example file_logging

use leveled_logs::prelude::*;
use leveled_logs::{errorf, infof, panicf, values, warnf};
use std::sync::Arc;

fn parse_port(logger: &Logger, raw: &str) -> Result<u16> {
    raw.parse()
        .map_err(|_| panicf!(logger, "invalid port {:?}", raw))
}

fn main() -> Result<()> {
    println!("=== Leveled Logs - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("leveled_logs_demo");
    let metrics = Arc::new(LoggerMetrics::new());
    let logger = Logger::builder()
        .level("debug")
        .console(true)
        .metrics(metrics.clone())
        .build();

    // Small files so the demo actually rotates
    let policy = RotationPolicy::new(1, 3, 7).with_max_bytes(2 * 1024);
    let path = logger.init_with_policy("demo", &dir, policy)?;
    println!("1. Logging to {}\n", path.display());

    infof!(logger, "service starting with {} workers", 4);
    logger.debugf(values!("config", "loaded", "from", "defaults"));
    warnf!(logger, "cache warmup took {}ms", 1250);
    errorf!(logger, "upstream {} unreachable", "billing");

    println!("\n2. Raising the threshold to warn:");
    logger.set_level("warn");
    infof!(logger, "this line is filtered");
    warnf!(logger, "this one is kept");

    println!("\n3. PANIC returns an error instead of unwinding:");
    if let Err(e) = parse_port(&logger, "eighty") {
        println!("   caller received: {}", e);
    }

    println!("\n4. Filling files to force rotation (console off):");
    logger.set_console_logging(false);
    for i in 0..200 {
        logger.errorf_silent(format_args!("bulk entry {}", i));
    }
    logger.flush()?;

    let snapshot = metrics.snapshot();
    println!(
        "   RSTAT_WARN={} RSTAT_ERROR={} RSTAT_PANIC={}",
        snapshot.warn, snapshot.error, snapshot.panic
    );

    let mut entries: Vec<_> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    println!("   files in {}:", dir.display());
    for name in entries {
        println!("     {}", name);
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
