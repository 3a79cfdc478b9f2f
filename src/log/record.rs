//! Log record codec
//!
//! Encodes key/value/tombstone triples into the on-disk record format and
//! parses them back out.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, TideError};

/// Fixed header size: timestamp (4) + key_len (4) + value_len (4) + tombstone (1)
pub const HEADER_SIZE: usize = 13;

/// Tombstone byte for a live record
pub const LIVE_FLAG: u8 = 0;

/// Tombstone byte for a deletion marker
pub const TOMBSTONE_FLAG: u8 = 1;

/// Parsed fixed-size record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Seconds since the Unix epoch, truncated to 32 bits
    pub timestamp: u32,
    pub key_len: u32,
    pub value_len: u32,
    pub tombstone: bool,
}

impl RecordHeader {
    /// Parse a header from its 13 raw bytes (all integers big-endian)
    pub fn parse(raw: &[u8; HEADER_SIZE]) -> Self {
        let mut buf = &raw[..];
        Self {
            timestamp: buf.get_u32(),
            key_len: buf.get_u32(),
            value_len: buf.get_u32(),
            tombstone: buf.get_u8() == TOMBSTONE_FLAG,
        }
    }

    /// Total size of the record this header starts: header + key + value
    pub fn record_len(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.key_len) + u64::from(self.value_len)
    }

    fn put(&self, buf: &mut BytesMut) {
        buf.put_u32(self.timestamp);
        buf.put_u32(self.key_len);
        buf.put_u32(self.value_len);
        buf.put_u8(if self.tombstone { TOMBSTONE_FLAG } else { LIVE_FLAG });
    }
}

/// A fully materialized record, as produced by [`super::LogReader::next_record`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub header: RecordHeader,
    pub key: Bytes,
    pub value: Bytes,
}

/// Current wall-clock time in seconds, truncated to 32 bits
pub fn unix_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// Encode a record stamped with the current time
///
/// Returns the timestamp written into the header alongside the bytes.
/// Lengths are truncated to `u32`; callers must reject oversized input first.
pub fn encode(key: &[u8], value: &[u8], tombstone: bool) -> (u32, Bytes) {
    let timestamp = unix_timestamp();
    (timestamp, encode_at(timestamp, key, value, tombstone))
}

/// Encode a record with an explicit timestamp
pub fn encode_at(timestamp: u32, key: &[u8], value: &[u8], tombstone: bool) -> Bytes {
    let header = RecordHeader {
        timestamp,
        key_len: key.len() as u32,
        value_len: value.len() as u32,
        tombstone,
    };

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + key.len() + value.len());
    header.put(&mut buf);
    buf.put_slice(key);
    buf.put_slice(value);
    buf.freeze()
}

/// Decode a record buffer into `(tombstone, value)`
///
/// `buf` must hold exactly one record. The key is skipped: callers already
/// know it from the index lookup. The returned value shares `buf`'s storage.
pub fn decode(buf: Bytes) -> Result<(bool, Bytes)> {
    let raw: &[u8; HEADER_SIZE] = buf
        .get(..HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| {
            TideError::Corruption(format!(
                "record of {} bytes is shorter than the {} byte header",
                buf.len(),
                HEADER_SIZE
            ))
        })?;
    let header = RecordHeader::parse(raw);

    if header.record_len() != buf.len() as u64 {
        return Err(TideError::Corruption(format!(
            "header declares {} bytes but buffer holds {}",
            header.record_len(),
            buf.len()
        )));
    }

    let value_start = HEADER_SIZE + header.key_len as usize;
    let value_end = value_start + header.value_len as usize;
    Ok((header.tombstone, buf.slice(value_start..value_end)))
}
