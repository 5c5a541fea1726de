//! Declarative logger configuration
//!
//! Every field has a default, so a partial document such as
//! `{"app_name": "svc", "console": true}` is valid.

use super::error::{LoggerError, Result};
use super::logger::Logger;
use crate::appenders::rotating_file::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Log file stem; empty means a nanosecond timestamp
    pub app_name: String,
    /// Directory of the log file; `None` or empty means the default
    pub base_dir: Option<PathBuf>,
    /// One of `debug`, `info`, `warn`, `error`
    pub level: String,
    /// Mirror lines to stdout
    pub console: bool,
    pub rotation: RotationPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            base_dir: None,
            level: "info".to_string(),
            console: false,
            rotation: RotationPolicy::default(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }
}

impl Logger {
    /// Build a logger from `config` and bind its file sink
    ///
    /// A file sink that cannot be bound is reported on stderr, exactly like
    /// [`Logger::init`].
    ///
    /// ```
    /// use leveled_logs::{Logger, LoggerConfig};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let json = format!(
    ///     r#"{{"app_name": "svc", "base_dir": {:?}, "level": "debug"}}"#,
    ///     dir.path()
    /// );
    /// let config = LoggerConfig::from_json_str(&json).unwrap();
    /// let logger = Logger::from_config(&config);
    ///
    /// assert_eq!(logger.level(), "debug");
    /// assert_eq!(logger.file_path(), Some(dir.path().join("svc.log")));
    /// ```
    #[track_caller]
    pub fn from_config(config: &LoggerConfig) -> Logger {
        let logger = Logger::builder()
            .level(config.level.clone())
            .console(config.console)
            .build();
        let base_dir = config.base_dir.clone().unwrap_or_default();
        if let Err(e) = logger.init_with_policy(&config.app_name, base_dir, config.rotation.clone()) {
            eprintln!("[LOGGER ERROR] could not create log directory. ({})", e);
        }
        logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = LoggerConfig::from_json_str(r#"{"app_name": "svc"}"#).unwrap();
        assert_eq!(config.app_name, "svc");
        assert_eq!(config.level, "info");
        assert!(!config.console);
        assert_eq!(config.base_dir, None);
        assert_eq!(config.rotation, RotationPolicy::default());
    }

    #[test]
    fn test_rotation_overrides() {
        let config = LoggerConfig::from_json_str(
            r#"{"rotation": {"max_size_mb": 50, "max_backups": 3, "compress": true}}"#,
        )
        .unwrap();
        assert_eq!(config.rotation.max_size_mb, 50);
        assert_eq!(config.rotation.max_backups, 3);
        assert_eq!(config.rotation.max_age_days, 28);
        assert!(config.rotation.compress);
    }

    #[test]
    fn test_malformed_document() {
        let err = LoggerConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = LoggerConfig::from_json_file("/nonexistent/leveled_logs.json").unwrap_err();
        assert!(err.to_string().contains("reading logger configuration"));
    }
}
