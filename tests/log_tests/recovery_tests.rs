//! Tests for Log Recovery
//!
//! These tests verify:
//! - Replay of a clean log (empty, single, many records)
//! - Last record wins, tombstones included
//! - Replay with a truncated tail
//! - Verify mode (stats only, no index returned)

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tidekv::config::SyncStrategy;
use tidekv::log::{record, LogRecovery, LogWriter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");
    (temp_dir, log_path)
}

/// Append `(key, value, tombstone)` records through LogWriter
fn write_records(path: &PathBuf, records: &[(&str, &str, bool)]) -> Vec<(u64, usize)> {
    let mut writer = LogWriter::open(path, SyncStrategy::EveryWrite).unwrap();
    records
        .iter()
        .map(|(key, value, tombstone)| {
            let bytes = record::encode_at(7, key.as_bytes(), value.as_bytes(), *tombstone);
            let offset = writer.append(&bytes).unwrap();
            (offset, bytes.len())
        })
        .collect()
}

// =============================================================================
// Replay: Clean Log Tests
// =============================================================================

#[test]
fn test_replay_empty_file() {
    let (_temp, log_path) = setup_temp_log();
    File::create(&log_path).unwrap();

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    assert!(index.is_empty());
    assert_eq!(stats.records_replayed, 0);
    assert_eq!(stats.bytes_replayed, 0);
    assert!(!stats.had_torn_tail());
}

#[test]
fn test_replay_single_record() {
    let (_temp, log_path) = setup_temp_log();
    let written = write_records(&log_path, &[("key", "value", false)]);

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    let entry = index.get(b"key").unwrap();
    assert_eq!(entry.offset, written[0].0);
    assert_eq!(entry.length, written[0].1 as u64);
    assert_eq!(entry.timestamp, 7);
    assert_eq!(stats.records_replayed, 1);
    assert_eq!(stats.keys_indexed, 1);
}

#[test]
fn test_replay_last_record_wins() {
    let (_temp, log_path) = setup_temp_log();
    let written = write_records(
        &log_path,
        &[("a", "1", false), ("b", "2", false), ("a", "3", false)],
    );

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get(b"a").unwrap().offset, written[2].0);
    assert_eq!(index.get(b"b").unwrap().offset, written[1].0);
    assert_eq!(stats.records_replayed, 3);
    assert_eq!(stats.keys_indexed, 2);
}

#[test]
fn test_replay_keeps_tombstones_indexed() {
    let (_temp, log_path) = setup_temp_log();
    let written = write_records(
        &log_path,
        &[("a", "1", false), ("b", "2", false), ("b", "", true), ("ghost", "", true)],
    );

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.get(b"b").unwrap().offset, written[2].0);
    assert_eq!(index.get(b"ghost").unwrap().offset, written[3].0);
    assert_eq!(stats.tombstones, 2);
}

#[test]
fn test_replay_many_records() {
    let (_temp, log_path) = setup_temp_log();
    let keys: Vec<String> = (0..500).map(|i| format!("key{}", i % 100)).collect();
    let records: Vec<(&str, &str, bool)> = keys.iter().map(|k| (k.as_str(), "v", false)).collect();
    write_records(&log_path, &records);

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    assert_eq!(index.len(), 100);
    assert_eq!(stats.records_replayed, 500);
    assert_eq!(stats.bytes_replayed, fs::metadata(&log_path).unwrap().len());
}

// =============================================================================
// Replay: Truncated Tail Tests
// =============================================================================

#[test]
fn test_replay_stops_at_partial_record() {
    let (_temp, log_path) = setup_temp_log();
    write_records(&log_path, &[("a", "1", false), ("b", "2", false)]);
    let good_len = fs::metadata(&log_path).unwrap().len();

    let partial = record::encode_at(9, b"c", b"3333", false);
    let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
    file.write_all(&partial[..partial.len() - 2]).unwrap();

    let (index, stats) = LogRecovery::replay(&log_path).unwrap();

    assert_eq!(index.len(), 2);
    assert!(!index.contains(b"c"));
    assert_eq!(stats.records_replayed, 2);
    assert_eq!(stats.bytes_replayed, good_len);
    assert_eq!(stats.bytes_discarded, (partial.len() - 2) as u64);
    assert!(stats.had_torn_tail());
}

// =============================================================================
// Verify Tests
// =============================================================================

#[test]
fn test_verify_matches_replay_stats() {
    let (_temp, log_path) = setup_temp_log();
    write_records(
        &log_path,
        &[("a", "1", false), ("a", "", true), ("b", "2", false)],
    );
    let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
    file.write_all(&[1, 2, 3]).unwrap();

    let verified = LogRecovery::verify(&log_path).unwrap();
    let (_, replayed) = LogRecovery::replay(&log_path).unwrap();

    assert_eq!(verified, replayed);
    assert_eq!(verified.bytes_discarded, 3);
}

#[test]
fn test_verify_does_not_modify_file() {
    let (_temp, log_path) = setup_temp_log();
    write_records(&log_path, &[("a", "1", false)]);
    let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
    file.write_all(&[0u8; 5]).unwrap();
    let before = fs::read(&log_path).unwrap();

    LogRecovery::verify(&log_path).unwrap();
    LogRecovery::replay(&log_path).unwrap();

    assert_eq!(fs::read(&log_path).unwrap(), before);
}
