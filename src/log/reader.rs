//! Log Reader
//!
//! Sequentially walks the records of a log file from offset 0.
//!
//! A record whose header or body runs past the end of the file is the tail
//! of an interrupted append. The reader stops in front of it and counts its
//! bytes as discarded; it is never reported as an error.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bytes::Bytes;

use super::record::{LogRecord, RecordHeader, HEADER_SIZE};
use crate::error::Result;

/// A record located by its header and key, value left unread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedKey {
    /// Offset of the record header within the log
    pub offset: u64,
    pub header: RecordHeader,
    pub key: Vec<u8>,
}

/// Reads records from a log file in file order
pub struct LogReader {
    reader: BufReader<File>,
    /// End of the last complete record read so far
    offset: u64,
    /// File length observed at open
    file_len: u64,
    /// Bytes of an incomplete trailing record, once the reader hits one
    discarded: u64,
}

impl LogReader {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();

        Ok(Self {
            reader: BufReader::new(file),
            offset: 0,
            file_len,
            discarded: 0,
        })
    }

    /// Read the next record's header and key, skipping over its value
    pub fn next_key(&mut self) -> Result<Option<ScannedKey>> {
        let (offset, header) = match self.next_header()? {
            Some(found) => found,
            None => return Ok(None),
        };

        let mut key = vec![0u8; header.key_len as usize];
        if !self.fill(&mut key)? {
            return Ok(None);
        }
        self.reader.seek_relative(i64::from(header.value_len))?;

        self.offset += header.record_len();
        Ok(Some(ScannedKey { offset, header, key }))
    }

    /// Read the next record in full
    pub fn next_record(&mut self) -> Result<Option<(u64, LogRecord)>> {
        let (offset, header) = match self.next_header()? {
            Some(found) => found,
            None => return Ok(None),
        };

        let mut key = vec![0u8; header.key_len as usize];
        let mut value = vec![0u8; header.value_len as usize];
        if !self.fill(&mut key)? || !self.fill(&mut value)? {
            return Ok(None);
        }

        self.offset += header.record_len();
        let record = LogRecord {
            header,
            key: Bytes::from(key),
            value: Bytes::from(value),
        };
        Ok(Some((offset, record)))
    }

    /// Iterate over all complete records
    pub fn records(self) -> LogIterator {
        LogIterator { reader: self, done: false }
    }

    /// End offset of the last complete record read
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the file when it was opened
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Bytes left unread because they form an incomplete trailing record
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    /// Read a header and make sure the whole record fits in the file
    fn next_header(&mut self) -> Result<Option<(u64, RecordHeader)>> {
        let remaining = self.file_len.saturating_sub(self.offset);
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < HEADER_SIZE as u64 {
            self.discarded = remaining;
            return Ok(None);
        }

        let mut raw = [0u8; HEADER_SIZE];
        if !self.fill(&mut raw)? {
            return Ok(None);
        }
        let header = RecordHeader::parse(&raw);

        if header.record_len() > remaining {
            self.discarded = remaining;
            return Ok(None);
        }

        Ok(Some((self.offset, header)))
    }

    /// `read_exact` that treats EOF as a truncated tail instead of an error
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        match self.reader.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.discarded = self.file_len.saturating_sub(self.offset);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Iterator over complete log records and their offsets
pub struct LogIterator {
    reader: LogReader,
    done: bool,
}

impl LogIterator {
    /// Bytes discarded at the tail (meaningful once iteration has ended)
    pub fn discarded_bytes(&self) -> u64 {
        self.reader.discarded_bytes()
    }
}

impl Iterator for LogIterator {
    type Item = Result<(u64, LogRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
