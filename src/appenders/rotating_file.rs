//! Rotating file appender with size-triggered rotation and backup retention
//!
//! The appender opens its file lazily on the first write. A write that would
//! push the file past the size limit first moves the current file aside to a
//! timestamped backup (`svc.log` becomes `svc-2024-05-01T13-45-07.123.log`,
//! UTC) and starts a fresh file. After every rotation old backups are retired
//! by count and by age, and the survivors are gzip-compressed when enabled.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogRecord;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const MEGABYTE: u64 = 1024 * 1024;

pub const DEFAULT_MAX_SIZE_MB: u64 = 500;
pub const DEFAULT_MAX_BACKUPS: usize = 10;
pub const DEFAULT_MAX_AGE_DAYS: u64 = 28;

/// Timestamp layout embedded in backup file names
pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const COMPRESS_SUFFIX: &str = ".gz";

/// Size, count and age limits for a rotating file
///
/// A `max_backups` or `max_age_days` of zero disables that retention rule.
///
/// # Examples
///
/// ```
/// use leveled_logs::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::default();
/// assert_eq!(policy.max_size_mb, 500);
/// assert_eq!(policy.max_backups, 10);
/// assert_eq!(policy.max_age_days, 28);
///
/// let policy = RotationPolicy::new(50, 3, 7).with_compression(true);
/// assert_eq!(policy.max_bytes(), 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Size in megabytes at which the file is rotated
    pub max_size_mb: u64,
    /// Maximum number of backups to keep
    pub max_backups: usize,
    /// Backups older than this many days are removed
    pub max_age_days: u64,
    /// Whether to gzip rotated backups
    pub compress: bool,
    /// Byte-exact size limit, takes precedence over `max_size_mb`
    #[serde(skip)]
    max_bytes_override: Option<u64>,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE_MB, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_AGE_DAYS)
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new(max_size_mb: u64, max_backups: usize, max_age_days: u64) -> Self {
        Self {
            max_size_mb,
            max_backups,
            max_age_days,
            compress: false,
            max_bytes_override: None,
        }
    }

    /// Enable compression
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Set an exact size limit in bytes instead of whole megabytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes_override = Some(bytes);
        self
    }

    /// Effective size limit in bytes
    ///
    /// A zero megabyte limit falls back to [`DEFAULT_MAX_SIZE_MB`].
    #[must_use]
    pub fn max_bytes(&self) -> u64 {
        if let Some(bytes) = self.max_bytes_override {
            return bytes;
        }
        let mb = if self.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size_mb
        };
        mb.saturating_mul(MEGABYTE)
    }
}

/// Create `dir` and its parents with mode `0o755`
pub(crate) fn create_log_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    timestamp: DateTime<Utc>,
}

/// Rotating file appender
///
/// # Examples
///
/// ```no_run
/// use leveled_logs::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let appender = RotatingFileAppender::new("/var/log/app/svc.log", RotationPolicy::default());
/// assert_eq!(appender.current_size(), 0);
/// ```
pub struct RotatingFileAppender {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Bind an appender to `path`. Nothing is opened until the first write.
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy,
            file: None,
            current_size: 0,
        }
    }

    /// Append raw bytes, rotating first if they would not fit
    ///
    /// # Errors
    ///
    /// Fails when `buf` alone is larger than the size limit, or when the file
    /// cannot be opened, rotated or written.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        let max = self.policy.max_bytes();
        if len > max {
            return Err(LoggerError::file_appender(
                self.path.display().to_string(),
                format!("write length {} exceeds maximum file size {}", len, max),
            ));
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        }

        if self.current_size + len > max {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        file.write_all(buf).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    /// Close the current file, move it to a backup and start a new one
    pub fn rotate(&mut self) -> Result<()> {
        self.file = None;
        self.open_new()?;
        self.mill();
        Ok(())
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> Result<()> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "opening log file",
                    format!("Cannot access file metadata: {}", self.path.display()),
                    e,
                ))
            }
        };

        if metadata.len() + write_len >= self.policy.max_bytes() {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.current_size = metadata.len();
                Ok(())
            }
            // Unreadable or corrupt existing file: start over
            Err(_) => self.open_new(),
        }
    }

    fn open_new(&mut self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_log_dir(dir).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", dir.display()),
                    e,
                )
            })?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        match fs::metadata(&self.path) {
            Ok(metadata) => {
                let backup = self.backup_path(Utc::now());
                fs::rename(&self.path, &backup).map_err(|e| {
                    LoggerError::file_rotation(
                        self.path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
                    options.mode(metadata.permissions().mode());
                }
                #[cfg(not(unix))]
                let _ = metadata;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(0o600);
                }
            }
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "rotating log file",
                    format!("Cannot access file metadata: {}", self.path.display()),
                    e,
                ))
            }
        }

        let file = options.open(&self.path).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to open new log file: {}", e),
            )
        })?;
        self.file = Some(file);
        self.current_size = 0;
        Ok(())
    }

    fn name_parts(&self) -> (String, String) {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            _ => (file_name.to_string(), String::new()),
        }
    }

    /// Backup path for a rotation at `at`
    fn backup_path(&self, at: DateTime<Utc>) -> PathBuf {
        let (stem, ext) = self.name_parts();
        self.path.with_file_name(format!(
            "{}-{}{}",
            stem,
            at.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    fn parse_backup_time(&self, file_name: &str) -> Option<DateTime<Utc>> {
        let (stem, ext) = self.name_parts();
        let file_name = file_name.strip_suffix(COMPRESS_SUFFIX).unwrap_or(file_name);
        let stamp = file_name
            .strip_prefix(stem.as_str())?
            .strip_prefix('-')?
            .strip_suffix(ext.as_str())?;
        let naive = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()?;
        Some(Utc.from_utc_datetime(&naive))
    }

    /// Backups of this file, newest first
    fn old_log_files(&self) -> io::Result<Vec<Backup>> {
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };

        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(timestamp) = self.parse_backup_time(name) {
                backups.push(Backup {
                    path: entry.path(),
                    timestamp,
                });
            }
        }
        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Paths of the backups currently on disk, newest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let backups = self.old_log_files().map_err(|e| {
            LoggerError::io_operation(
                "listing log backups",
                format!("Cannot read directory of '{}'", self.path.display()),
                e,
            )
        })?;
        Ok(backups.into_iter().map(|b| b.path).collect())
    }

    /// Apply retention and compression to the existing backups
    fn mill(&self) {
        if let Err(e) = self.mill_run() {
            eprintln!(
                "[WARN] Failed to clean up backups of {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn mill_run(&self) -> Result<()> {
        if self.policy.max_backups == 0 && self.policy.max_age_days == 0 && !self.policy.compress {
            return Ok(());
        }

        let files = self.old_log_files()?;
        let mut remove = Vec::new();
        let mut remaining = files;

        if self.policy.max_backups > 0 && self.policy.max_backups < remaining.len() {
            // A backup and its compressed twin count once
            let mut preserved = std::collections::HashSet::new();
            let mut kept = Vec::new();
            for backup in remaining {
                let name = backup.path.to_string_lossy();
                let key = name.strip_suffix(COMPRESS_SUFFIX).unwrap_or(&name).to_string();
                preserved.insert(key);
                if preserved.len() > self.policy.max_backups {
                    remove.push(backup);
                } else {
                    kept.push(backup);
                }
            }
            remaining = kept;
        }

        if self.policy.max_age_days > 0 {
            let max_age = i64::try_from(self.policy.max_age_days).unwrap_or(i64::MAX / 86_400);
            let cutoff = Utc::now() - ChronoDuration::days(max_age);
            let (old, young): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|b| b.timestamp < cutoff);
            remove.extend(old);
            remaining = young;
        }

        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[WARN] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in remaining
                .iter()
                .filter(|b| !b.path.to_string_lossy().ends_with(COMPRESS_SUFFIX))
            {
                compress_file(&backup.path)?;
            }
        }

        Ok(())
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

/// Gzip `path` to `path.gz`, removing the original only once the compressed
/// copy is complete
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let mut gz_name = path.as_os_str().to_os_string();
    gz_name.push(COMPRESS_SUFFIX);
    let gz_path = PathBuf::from(gz_name);
    let mut tmp_name = gz_path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(tmp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut writer| writer.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "RotatingFileAppender"
    }

    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.write_bytes(record.to_line().as_bytes())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}
