//! Severity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name reported by [`Severity::threshold_name`] callers when the stored
/// threshold is not one of the four configurable levels.
pub const INVALID_LEVEL_NAME: &str = "wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Severity {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Panic = 4,
    Fatal = 5,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Display label used inside the `[LABEL]` tag of every line
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
        }
    }

    /// Lowercase configuration name, only for the levels usable as a threshold.
    ///
    /// `Panic` and `Fatal` always emit and can never be configured as the
    /// minimum level, so they have no name here.
    pub fn threshold_name(&self) -> Option<&'static str> {
        match self {
            Severity::Debug => Some("debug"),
            Severity::Info => Some("info"),
            Severity::Warn => Some("warn"),
            Severity::Error => Some("error"),
            Severity::Panic | Severity::Fatal => None,
        }
    }

    /// Whether a call at `self` passes a gate configured at `threshold`
    #[inline]
    pub fn passes(&self, threshold: Severity) -> bool {
        *self >= threshold
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warn => Yellow,
            Severity::Error => Red,
            Severity::Panic => Magenta,
            Severity::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a threshold name.
///
/// Only the exact lowercase names `debug`, `info`, `warn` and `error` are
/// accepted; there are no aliases and matching is case-sensitive.
impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
