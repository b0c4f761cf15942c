//! Size-based rotating log file
//!
//! [`RollingFile`] is an append-only writer for one log path. When a write
//! would push the file past its size limit, the current file is renamed to a
//! timestamped backup and a fresh file is opened in its place:
//!
//! ```text
//! logs/app.log                                  <- current
//! logs/app-2025-01-15T10-30-45.123.log.lz4      <- compressed backup
//! logs/app-2025-01-14T22-04-10.871.log.lz4
//! ```
//!
//! After every rotation the backups are milled on a background thread: the
//! ones beyond `max_backups` or older than `max_age_days` are removed, and the
//! rest are lz4-compressed when `compress` is set.
//!
//! The file is opened lazily on the first write. An existing file is
//! appended to as long as the next write fits.

mod backup;
mod mill;

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime, Utc};

use crate::common::{Result, SinkError};

use mill::{MillPolicy, Miller};

pub use backup::{BACKUP_TIME_FORMAT, COMPRESSED_SUFFIX, Backup, BackupName};

pub const MEGABYTE: u64 = 1024 * 1024;

/// Default size limit in megabytes
pub const DEFAULT_MAX_SIZE_MB: u64 = 500;

/// Default number of retained backups
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Default backup age limit in days
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;

/// Default write buffer size (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Rotation settings for one log path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Path of the current log file
    pub path: PathBuf,

    /// Size limit of the current file in bytes
    pub max_size_bytes: u64,

    /// Backups to retain (0 keeps all)
    pub max_backups: usize,

    /// Maximum backup age in days (0 disables age pruning)
    pub max_age_days: u32,

    /// Compress backups with lz4
    pub compress: bool,

    /// Timestamp backups in local time instead of UTC
    pub local_time: bool,

    /// Write buffer size (0 writes through)
    pub buffer_size: usize,
}

impl RotationConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            compress: true,
            local_time: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_size_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use]
    pub fn with_max_size_bytes(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    #[must_use]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    #[must_use]
    pub fn with_local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Effective size limit; zero falls back to the default
    pub fn max_size(&self) -> u64 {
        if self.max_size_bytes == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            self.max_size_bytes
        }
    }
}

/// Append-only log file that rotates by size
///
/// Not synchronized: a sink wraps it in a mutex so concurrent writers to the
/// same path take turns.
#[derive(Debug)]
pub struct RollingFile {
    config: RotationConfig,
    names: BackupName,
    file: Option<BufWriter<File>>,
    size: u64,
    rotations: u64,
    /// Timestamp of the newest backup this writer created
    last_backup: Option<NaiveDateTime>,
    miller: Miller,
}

impl RollingFile {
    /// Create the writer without touching the filesystem
    pub fn new(config: RotationConfig) -> Self {
        let names = BackupName::for_path(&config.path);
        let miller = Miller::new(MillPolicy::new(&config));
        Self {
            config,
            names,
            file: None,
            size: 0,
            rotations: 0,
            last_backup: None,
            miller,
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Bytes in the current file, including buffered ones
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Rotations performed by this writer
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    /// Append one line, rotating first if it would not fit
    pub fn write(&mut self, line: &[u8]) -> Result<usize> {
        let len = line.len() as u64;
        let max = self.config.max_size();
        if len > max {
            return Err(SinkError::too_large(len, max));
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        }
        if self.size + len > max {
            self.rotate()?;
        }

        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "log file is not open").into());
        };
        file.write_all(line)?;
        self.size += len;

        Ok(line.len())
    }

    /// Drain buffered bytes to the file
    pub fn flush(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Flush and close the current file; the next write reopens it
    ///
    /// Waits for pending backup milling and stops the mill worker.
    pub fn close(&mut self) -> Result<()> {
        let result = self.close_current();
        self.miller.shutdown();
        result
    }

    /// Block until backups from earlier rotations are pruned and compressed
    pub fn wait_for_mill(&self) {
        self.miller.wait();
    }

    /// Move the current file to a backup and start a new one
    ///
    /// Backups are milled in the background; see [`RollingFile::wait_for_mill`].
    pub fn rotate(&mut self) -> Result<()> {
        self.close_current()?;
        self.open_new()?;
        self.rotations += 1;

        tracing::info!(
            path = %self.config.path.display(),
            rotations = self.rotations,
            "log file rotated"
        );

        self.miller.request();
        Ok(())
    }

    /// Backups currently on disk, newest first
    pub fn backups(&self) -> Result<Vec<Backup>> {
        Ok(self.names.list(&self.config.path)?)
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.get_ref().sync_all()?;
        }
        self.size = 0;
        Ok(())
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> Result<()> {
        let existing = match fs::metadata(&self.config.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.open_new()?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if existing + write_len > self.config.max_size() {
            return self.rotate();
        }

        let file = OpenOptions::new().append(true).open(&self.config.path)?;
        self.file = Some(self.buffered(file));
        self.size = existing;

        tracing::debug!(
            path = %self.config.path.display(),
            size = existing,
            "opened existing log file"
        );
        Ok(())
    }

    fn open_new(&mut self) -> Result<()> {
        let path = &self.config.path;
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        if path.exists() {
            // Backup timestamps must keep increasing across rotations
            let now = now(self.config.local_time);
            let stamp = match self.last_backup {
                Some(last) if last >= now => last + Duration::milliseconds(1),
                _ => now,
            };
            let (backup, stamp) = self.names.free_path(path, stamp);
            fs::rename(path, &backup)?;
            self.last_backup = Some(stamp);
            tracing::debug!(
                path = %path.display(),
                backup = %backup.display(),
                "moved log file to backup"
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        self.size = 0;

        self.file = Some(self.buffered(file));
        Ok(())
    }

    fn buffered(&self, file: File) -> BufWriter<File> {
        BufWriter::with_capacity(self.config.buffer_size, file)
    }
}

/// Current wall-clock time for backup stamps
fn now(local_time: bool) -> NaiveDateTime {
    if local_time {
        Local::now().naive_local()
    } else {
        Utc::now().naive_utc()
    }
}

impl Drop for RollingFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.as_mut()
            && let Err(e) = file.flush()
        {
            tracing::warn!(
                path = %self.config.path.display(),
                error = %e,
                "failed to flush log file on drop"
            );
        }
    }
}

#[cfg(test)]
#[path = "rotation_test.rs"]
mod rotation_test;
