//! Backup naming, discovery and compression

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use lz4_flex::frame::FrameEncoder;

use crate::common::{Result, SinkError};

/// Timestamp embedded in backup names (`2025-01-15T10-30-45.123`)
pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Suffix appended to compressed backups
pub const COMPRESSED_SUFFIX: &str = ".lz4";

/// A rotated log file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
    pub compressed: bool,
}

/// Name scheme of a log path's backups: `<stem>-<timestamp><ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    prefix: String,
    ext: String,
}

impl BackupName {
    /// `logs/app.log` gives prefix `app-` and extension `.log`
    pub fn for_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            prefix: format!("{stem}-"),
            ext,
        }
    }

    pub fn file_name(&self, timestamp: NaiveDateTime) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            timestamp.format(BACKUP_TIME_FORMAT),
            self.ext
        )
    }

    /// Backup path for `timestamp`, moved forward a millisecond at a time
    /// until neither the plain nor the compressed name is taken
    pub fn free_path(
        &self,
        path: &Path,
        mut timestamp: NaiveDateTime,
    ) -> (PathBuf, NaiveDateTime) {
        let dir = parent_dir(path);
        loop {
            let candidate = dir.join(self.file_name(timestamp));
            if !candidate.exists() && !compressed_path(&candidate).exists() {
                return (candidate, timestamp);
            }
            timestamp += Duration::milliseconds(1);
        }
    }

    /// Timestamp and compression flag of a backup file name
    pub fn parse(&self, file_name: &str) -> Option<(NaiveDateTime, bool)> {
        let rest = file_name.strip_prefix(self.prefix.as_str())?;
        let (rest, compressed) = match rest.strip_suffix(COMPRESSED_SUFFIX) {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let stamp = rest.strip_suffix(self.ext.as_str())?;
        let timestamp = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()?;
        Some((timestamp, compressed))
    }

    /// Backups of `path`, newest first
    pub fn list(&self, path: &Path) -> io::Result<Vec<Backup>> {
        let entries = match fs::read_dir(parent_dir(path)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some((timestamp, compressed)) = name.to_str().and_then(|n| self.parse(n)) else {
                continue;
            };
            backups.push(Backup {
                path: entry.path(),
                timestamp,
                compressed,
            });
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(COMPRESSED_SUFFIX);
    PathBuf::from(name)
}

/// Compress `src` into `<src>.lz4` and remove `src`
///
/// A partial output file is removed on failure and `src` is left in place.
pub(crate) fn compress(src: &Path) -> Result<PathBuf> {
    let dst = compressed_path(src);

    if let Err(e) = write_compressed(src, &dst) {
        let _ = fs::remove_file(&dst);
        return Err(e);
    }

    fs::remove_file(src)?;
    Ok(dst)
}

fn write_compressed(src: &Path, dst: &Path) -> Result<()> {
    let mut input = File::open(src)?;
    let mut encoder = FrameEncoder::new(BufWriter::new(File::create(dst)?));

    io::copy(&mut input, &mut encoder)?;

    let mut output = encoder
        .finish()
        .map_err(|e| SinkError::compression(dst.display().to_string(), e.to_string()))?;
    output.flush()?;
    output.get_ref().sync_all()?;
    Ok(())
}
