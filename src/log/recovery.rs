//! Log Recovery
//!
//! Rebuilds the key index by replaying the log from the beginning.

use std::collections::HashSet;
use std::path::Path;

use super::LogReader;
use crate::error::Result;
use crate::index::{IndexEntry, KeyIndex};

/// Rebuilds the in-memory index from a log file
pub struct LogRecovery;

/// What a replay saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Complete records replayed
    pub records_replayed: u64,

    /// How many of those were tombstones
    pub tombstones: u64,

    /// Distinct keys left in the index
    pub keys_indexed: u64,

    /// Bytes covered by complete records
    pub bytes_replayed: u64,

    /// Bytes of an incomplete trailing record, left in place
    pub bytes_discarded: u64,
}

impl ReplayStats {
    /// Whether replay stopped in front of an incomplete trailing record
    pub fn had_torn_tail(&self) -> bool {
        self.bytes_discarded > 0
    }
}

impl LogRecovery {
    /// Replay a log file into a fresh index
    ///
    /// Every record, tombstone or not, overwrites the entry for its key, so
    /// the result matches what the same appends produced while live.
    /// Replay stops at end of file or at a truncated trailing record.
    pub fn replay(path: &Path) -> Result<(KeyIndex, ReplayStats)> {
        let mut reader = LogReader::open(path)?;
        let mut index = KeyIndex::new();
        let mut stats = ReplayStats::default();

        while let Some(scanned) = reader.next_key()? {
            stats.records_replayed += 1;
            if scanned.header.tombstone {
                stats.tombstones += 1;
            }

            index.insert(
                scanned.key,
                IndexEntry {
                    timestamp: scanned.header.timestamp,
                    offset: scanned.offset,
                    length: scanned.header.record_len(),
                },
            );
        }

        stats.keys_indexed = index.len() as u64;
        stats.bytes_replayed = reader.offset();
        stats.bytes_discarded = reader.discarded_bytes();

        Ok((index, stats))
    }

    /// Scan a log file and report stats without keeping the index
    pub fn verify(path: &Path) -> Result<ReplayStats> {
        let mut reader = LogReader::open(path)?;
        let mut keys = HashSet::new();
        let mut stats = ReplayStats::default();

        while let Some(scanned) = reader.next_key()? {
            stats.records_replayed += 1;
            if scanned.header.tombstone {
                stats.tombstones += 1;
            }
            keys.insert(scanned.key);
        }

        stats.keys_indexed = keys.len() as u64;
        stats.bytes_replayed = reader.offset();
        stats.bytes_discarded = reader.discarded_bytes();

        Ok(stats)
    }
}
