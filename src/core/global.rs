//! Process-wide logger instance
//!
//! Applications that do not want to thread a [`Logger`] through their code can
//! configure and use this one. It is created on first access with the
//! [`Logger::new`] defaults.

use super::logger::Logger;
use super::standard::Printf;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The shared process-wide logger
///
/// ```
/// leveled_logs::global().set_level("warn");
/// assert_eq!(leveled_logs::global().level(), "warn");
/// ```
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// The process-wide logger as a printf-style capability
pub fn standard_interface() -> &'static dyn Printf {
    global()
}
