//! Log Writer
//!
//! Owns the log file handle: appends encoded records at the end of the file
//! and reads records back by offset.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::config::SyncStrategy;
use crate::error::Result;

/// Appends records to the log and serves positioned reads
pub struct LogWriter {
    path: PathBuf,
    /// Opened in append mode: every write lands at the end of the file
    /// regardless of where the last read left the file position.
    file: File,
    /// Offset where the next append lands; equals the file length
    cursor: u64,
    sync_strategy: SyncStrategy,
}

impl LogWriter {
    /// Open or create a log file
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;
        let cursor = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            cursor,
            sync_strategy,
        })
    }

    /// Append an encoded record, returning the offset it was written at
    ///
    /// If the write fails partway, whatever part of the record reached the
    /// file is cut off again so the log still ends on a record boundary.
    pub fn append(&mut self, record: &[u8]) -> Result<u64> {
        let offset = self.cursor;

        if let Err(e) = self.write_record(record) {
            self.rollback(offset);
            return Err(e);
        }

        self.cursor += record.len() as u64;
        Ok(offset)
    }

    /// Cut the file back to `len` bytes and move the cursor there
    pub fn truncate(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)?;
        self.cursor = len;
        Ok(())
    }

    /// Undo a partial append that started at `offset`
    fn rollback(&mut self, offset: u64) {
        if let Err(e) = self.truncate(offset) {
            tracing::error!(
                path = %self.path.display(),
                offset,
                error = %e,
                "Failed to roll back partial append"
            );
            // Keep offsets truthful even though the tail could not be removed
            if let Ok(meta) = self.file.metadata() {
                self.cursor = meta.len();
            }
        }
    }

    fn write_record(&mut self, record: &[u8]) -> Result<()> {
        self.file.write_all(record)?;
        self.file.flush()?;
        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Read exactly `len` bytes starting at `offset`
    pub fn read_at(&mut self, offset: u64, len: u64) -> Result<Bytes> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Offset of the next append
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
