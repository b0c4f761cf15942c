//! Tests for the rotating log file

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use lz4_flex::frame::FrameDecoder;
use tempfile::TempDir;

use crate::SinkError;
use crate::rotation::{
    BackupName, DEFAULT_BUFFER_SIZE, MEGABYTE, RollingFile, RotationConfig,
};

fn stamp(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_milli_opt(h, m, s, ms)
        .unwrap()
}

/// Uncompressed, unbuffered config with a tiny size limit
fn small_config(path: &Path, max_size: u64) -> RotationConfig {
    RotationConfig::new(path)
        .with_max_size_bytes(max_size)
        .with_max_backups(0)
        .with_max_age_days(0)
        .with_compress(false)
        .with_buffer_size(0)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// RotationConfig Tests
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = RotationConfig::new("logs/app.log");

    assert_eq!(config.max_size_bytes, 500 * MEGABYTE);
    assert_eq!(config.max_backups, 5);
    assert_eq!(config.max_age_days, 7);
    assert!(config.compress);
    assert!(config.local_time);
    assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
}

#[test]
fn test_config_zero_size_uses_default() {
    let config = RotationConfig::new("app.log").with_max_size_mb(0);
    assert_eq!(config.max_size(), 500 * MEGABYTE);

    let config = RotationConfig::new("app.log").with_max_size_mb(3);
    assert_eq!(config.max_size(), 3 * MEGABYTE);
}

// ============================================================================
// BackupName Tests
// ============================================================================

#[test]
fn test_backup_file_name() {
    let names = BackupName::for_path(Path::new("logs/app.log"));
    assert_eq!(
        names.file_name(stamp(10, 30, 45, 123)),
        "app-2025-01-15T10-30-45.123.log"
    );
}

#[test]
fn test_backup_file_name_with_sink_suffix() {
    let names = BackupName::for_path(Path::new("logs/app.log.Request"));
    assert_eq!(
        names.file_name(stamp(8, 0, 0, 5)),
        "app.log-2025-01-15T08-00-00.005.Request"
    );

    let names = BackupName::for_path(Path::new("app"));
    assert_eq!(names.file_name(stamp(8, 0, 0, 5)), "app-2025-01-15T08-00-00.005");
}

#[test]
fn test_backup_parse() {
    let names = BackupName::for_path(Path::new("logs/app.log"));

    assert_eq!(
        names.parse("app-2025-01-15T10-30-45.123.log"),
        Some((stamp(10, 30, 45, 123), false))
    );
    assert_eq!(
        names.parse("app-2025-01-15T10-30-45.123.log.lz4"),
        Some((stamp(10, 30, 45, 123), true))
    );

    assert_eq!(names.parse("app.log"), None);
    assert_eq!(names.parse("app-yesterday.log"), None);
    assert_eq!(names.parse("other-2025-01-15T10-30-45.123.log"), None);
    assert_eq!(names.parse("app-2025-01-15T10-30-45.123.txt"), None);
}

#[test]
fn test_backup_names_do_not_cross_sinks() {
    let general = BackupName::for_path(Path::new("logs/app.log"));
    let request = BackupName::for_path(Path::new("logs/app.log.Request"));

    let request_backup = request.file_name(stamp(1, 2, 3, 4));
    assert_eq!(general.parse(&request_backup), None);

    let general_backup = general.file_name(stamp(1, 2, 3, 4));
    assert_eq!(request.parse(&general_backup), None);
}

#[test]
fn test_free_path_skips_taken_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let names = BackupName::for_path(&path);

    fs::write(dir.path().join(names.file_name(stamp(1, 0, 0, 0))), "a").unwrap();
    fs::write(
        dir.path()
            .join(format!("{}.lz4", names.file_name(stamp(1, 0, 0, 1)))),
        "b",
    )
    .unwrap();

    let (free, used) = names.free_path(&path, stamp(1, 0, 0, 0));
    assert_eq!(used, stamp(1, 0, 0, 2));
    assert_eq!(free, dir.path().join(names.file_name(used)));
}

// ============================================================================
// RollingFile Tests
// ============================================================================

#[test]
fn test_lazy_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/app.log");

    let mut file = RollingFile::new(small_config(&path, 1024));
    assert!(!file.is_open());
    assert!(!path.exists());

    file.write(b"first\n").unwrap();
    assert!(file.is_open());
    assert_eq!(read(&path), "first\n");
}

#[test]
fn test_appends_to_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "old\n").unwrap();

    let mut file = RollingFile::new(small_config(&path, 1024));
    file.write(b"new\n").unwrap();

    assert_eq!(read(&path), "old\nnew\n");
    assert_eq!(file.size(), 8);
    assert!(file.backups().unwrap().is_empty());
}

#[test]
fn test_rotates_when_full() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 25));

    file.write(b"line-0001\n").unwrap();
    file.write(b"line-0002\n").unwrap();
    assert_eq!(file.rotations(), 0);

    file.write(b"line-0003\n").unwrap();
    assert_eq!(file.rotations(), 1);
    assert_eq!(read(&path), "line-0003\n");
    assert_eq!(file.size(), 10);

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(!backups[0].compressed);
    assert_eq!(read(&backups[0].path), "line-0001\nline-0002\n");
}

#[test]
fn test_rotates_full_existing_file_on_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "0123456789012345678\n").unwrap();

    let mut file = RollingFile::new(small_config(&path, 25));
    file.write(b"line-0001\n").unwrap();

    assert_eq!(read(&path), "line-0001\n");
    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(read(&backups[0].path), "0123456789012345678\n");
}

#[test]
fn test_rejects_oversized_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 8));

    let err = file.write(b"this line is too long\n").unwrap_err();
    assert!(matches!(err, SinkError::TooLarge { size: 22, max: 8 }));
    assert!(!path.exists());
}

#[test]
fn test_prunes_by_count_keeping_newest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 7).with_max_backups(2));

    for i in 0..5 {
        file.write(format!("line-{i}\n").as_bytes()).unwrap();
    }

    file.wait_for_mill();
    assert_eq!(file.rotations(), 4);
    assert_eq!(read(&path), "line-4\n");

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert_eq!(read(&backups[0].path), "line-3\n");
    assert_eq!(read(&backups[1].path), "line-2\n");
}

#[test]
fn test_prunes_by_age() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let names = BackupName::for_path(&path);

    let ancient = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_milli_opt(0, 0, 0, 0)
        .unwrap();
    let ancient_path = dir.path().join(names.file_name(ancient));
    fs::write(&ancient_path, "ancient\n").unwrap();

    let mut file = RollingFile::new(small_config(&path, 7).with_max_age_days(7));
    file.write(b"line-0\n").unwrap();
    file.write(b"line-1\n").unwrap();
    file.wait_for_mill();

    assert!(!ancient_path.exists());
    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(read(&backups[0].path), "line-0\n");
}

#[test]
fn test_compresses_backups() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 11).with_compress(true));

    file.write(b"first line\n").unwrap();
    file.write(b"other line\n").unwrap();
    file.wait_for_mill();

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].compressed);
    assert!(backups[0].path.to_string_lossy().ends_with(".log.lz4"));

    let mut decoder = FrameDecoder::new(fs::File::open(&backups[0].path).unwrap());
    let mut text = String::new();
    decoder.read_to_string(&mut text).unwrap();
    assert_eq!(text, "first line\n");

    // Only the compressed copy remains
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 2);
}

#[test]
fn test_utc_timestamps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 7).with_local_time(false));

    let before = chrono::Utc::now().naive_utc();
    file.write(b"line-0\n").unwrap();
    file.write(b"line-1\n").unwrap();

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].timestamp >= before - chrono::Duration::seconds(1));
}

#[test]
fn test_flush_drains_buffer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 1024).with_buffer_size(4096));

    file.write(b"buffered\n").unwrap();
    assert_eq!(read(&path), "");

    file.flush().unwrap();
    assert_eq!(read(&path), "buffered\n");
}

#[test]
fn test_close_then_write_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 1024).with_buffer_size(4096));

    file.write(b"one\n").unwrap();
    file.close().unwrap();
    assert!(!file.is_open());
    assert_eq!(read(&path), "one\n");

    file.write(b"two\n").unwrap();
    file.flush().unwrap();
    assert_eq!(read(&path), "one\ntwo\n");
    assert_eq!(file.size(), 8);
}

#[test]
fn test_explicit_rotate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 1024));

    file.write(b"before\n").unwrap();
    file.rotate().unwrap();
    file.write(b"after\n").unwrap();

    assert_eq!(read(&path), "after\n");
    assert_eq!(file.backups().unwrap().len(), 1);
}

#[test]
fn test_compression_runs_off_the_write_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 7).with_compress(true));

    file.write(b"line-0\n").unwrap();
    file.write(b"line-1\n").unwrap();
    file.wait_for_mill();
    assert!(file.miller.is_running());

    // With the worker parked the rotating write still returns
    let release = file.miller.hold();
    file.write(b"line-2\n").unwrap();
    assert_eq!(file.rotations(), 2);
    assert_eq!(read(&path), "line-2\n");

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert!(!backups[0].compressed);
    assert_eq!(read(&backups[0].path), "line-1\n");
    assert!(backups[1].compressed);

    release.send(()).unwrap();
    file.wait_for_mill();

    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|b| b.compressed));
}

#[test]
fn test_close_finishes_pending_mill() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let mut file = RollingFile::new(small_config(&path, 7).with_compress(true));

    let release = file.miller.hold();
    file.write(b"line-0\n").unwrap();
    file.write(b"line-1\n").unwrap();
    drop(release);

    file.close().unwrap();
    assert!(!file.miller.is_running());
    let backups = file.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].compressed);

    // A later rotation starts a fresh worker
    file.write(b"line-2\n").unwrap();
    file.write(b"line-3\n").unwrap();
    file.wait_for_mill();
    assert!(file.miller.is_running());
    assert!(file.backups().unwrap().iter().all(|b| b.compressed));
}
