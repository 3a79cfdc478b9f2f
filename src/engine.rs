//! Engine Module
//!
//! The log-structured store that ties the log and the index together.
//!
//! ## Responsibilities
//! - Append a record for every Set/Delete and repoint the index at it
//! - Serve reads by seeking to the indexed record
//! - Rebuild the index from the log on open

use std::fs;
use std::path::Path;

use bytes::Bytes;
use parking_lot::lock_api::{self, RawMutex};

use crate::config::Config;
use crate::error::{Result, TideError};
use crate::index::{IndexEntry, KeyIndex};
use crate::log::{record, LogRecovery, LogWriter, ReplayStats};

/// Store using `parking_lot`'s mutex for its critical section
pub type Store = LogStore<parking_lot::RawMutex>;

/// Log-structured key-value store
///
/// ## Concurrency Model: one global critical section
///
/// Every operation, reads included, takes the same exclusive lock around the
/// log file position and the index. Reads seek the shared file handle, so
/// they cannot run alongside each other or alongside appends.
///
/// The lock type is a parameter: any `lock_api::RawMutex` can stand in for
/// the default without changing the API.
pub struct LogStore<R: RawMutex> {
    /// Store configuration
    config: Config,

    /// Log handle and index, guarded together
    state: lock_api::Mutex<R, StoreState>,

    /// What the opening replay found
    replay_stats: ReplayStats,
}

struct StoreState {
    log: LogWriter,
    index: KeyIndex,
    size_warned: bool,
}

impl<R: RawMutex> LogStore<R> {
    /// Open or create a store at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().log_path(path.as_ref()).build();
        Self::open_with_config(config)
    }

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory if needed
    /// 2. Open/create the log file
    /// 3. Replay it to rebuild the index
    /// 4. Cut off an incomplete trailing record, if replay found one
    pub fn open_with_config(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut log = LogWriter::open(&config.log_path, config.sync_strategy)?;
        let (index, replay_stats) = LogRecovery::replay(&config.log_path)?;

        // New appends must start on a record boundary, or the next replay
        // would read the torn header over them.
        if replay_stats.had_torn_tail() {
            tracing::warn!(
                path = %config.log_path.display(),
                bytes = replay_stats.bytes_discarded,
                "Cutting incomplete trailing record found during replay"
            );
            log.truncate(replay_stats.bytes_replayed)?;
        }
        tracing::info!(
            path = %config.log_path.display(),
            records = replay_stats.records_replayed,
            tombstones = replay_stats.tombstones,
            keys = replay_stats.keys_indexed,
            "Log replay complete"
        );

        let size_warned = log.cursor() > config.max_file_size;
        if size_warned {
            tracing::warn!(
                size = log.cursor(),
                max = config.max_file_size,
                "Log exceeds max file size; no rotation is performed"
            );
        }

        Ok(Self {
            config,
            state: lock_api::Mutex::new(StoreState {
                log,
                index,
                size_warned,
            }),
            replay_stats,
        })
    }

    /// Set a key-value pair
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        check_len("key", key)?;
        check_len("value", value)?;

        let mut state = self.state.lock();
        state.append(key, value, false, self.config.max_file_size)
    }

    /// Get the value for a key
    ///
    /// Returns `Ok(None)` both for keys never written and for keys whose
    /// newest record is a tombstone.
    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        let mut state = self.state.lock();

        let entry = match state.index.get(key) {
            Some(entry) => *entry,
            None => return Ok(None),
        };

        let buf = state.log.read_at(entry.offset, entry.length)?;
        let (tombstone, value) = record::decode(buf)?;

        if tombstone {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    /// Delete a key
    ///
    /// Appends a tombstone and repoints the index at it; the key stays
    /// indexed. Deleting a key that was never written is allowed.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        check_len("key", key)?;

        let mut state = self.state.lock();
        state.append(key, &[], true, self.config.max_file_size)
    }

    /// Whether the key has an index entry
    ///
    /// The entry may point at a tombstone; use [`Self::get`] for liveness.
    pub fn exists(&self, key: &[u8]) -> bool {
        self.state.lock().index.contains(key)
    }

    /// Snapshot of all indexed keys, tombstoned ones included
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.state.lock().index.keys()
    }

    /// Index entry for a key, if any
    pub fn get_entry(&self, key: &[u8]) -> Option<IndexEntry> {
        self.state.lock().index.get(key).copied()
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().index.is_empty()
    }

    /// Offset where the next record will be appended
    pub fn write_cursor(&self) -> u64 {
        self.state.lock().log.cursor()
    }

    /// Force the log to disk
    pub fn sync(&self) -> Result<()> {
        self.state.lock().log.sync()
    }

    /// Close the store, syncing the log first
    pub fn close(self) -> Result<()> {
        let mut state = self.state.into_inner();
        state.log.sync()?;
        tracing::debug!(path = %state.log.path().display(), "Store closed");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Stats from the replay performed at open
    pub fn replay_stats(&self) -> ReplayStats {
        self.replay_stats
    }

    pub fn path(&self) -> &Path {
        &self.config.log_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl StoreState {
    /// Encode, append, then repoint the index. Called with the lock held.
    fn append(
        &mut self,
        key: &[u8],
        value: &[u8],
        tombstone: bool,
        max_file_size: u64,
    ) -> Result<()> {
        let (timestamp, bytes) = record::encode(key, value, tombstone);
        let offset = self.log.append(&bytes)?;

        self.index.insert(
            key.to_vec(),
            IndexEntry {
                timestamp,
                offset,
                length: bytes.len() as u64,
            },
        );

        tracing::debug!(offset, len = bytes.len(), tombstone, "Appended record");

        if !self.size_warned && self.log.cursor() > max_file_size {
            self.size_warned = true;
            tracing::warn!(
                size = self.log.cursor(),
                max = max_file_size,
                "Log exceeds max file size; no rotation is performed"
            );
        }

        Ok(())
    }
}

fn check_len(field: &'static str, bytes: &[u8]) -> Result<()> {
    if bytes.len() > u32::MAX as usize {
        return Err(TideError::RecordTooLarge {
            field,
            len: bytes.len(),
        });
    }
    Ok(())
}
