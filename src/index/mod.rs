//! Index Module
//!
//! In-memory map from key to the location of that key's newest log record.
//!
//! ## Responsibilities
//! - One entry per key, always the most recently appended record
//! - Tombstones stay indexed; liveness is decided when the record is read
//! - Never persisted: rebuilt from the log on every open
//!
//! ## Data Structure Choice
//! Using HashMap for V1:
//! - Point lookups only, no ordering needed
//! - Concurrency is handled by the store's single lock, not here

mod table;

pub use table::KeyIndex;

/// Location of a key's newest record in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Timestamp copied from the record header (diagnostic only)
    pub timestamp: u32,

    /// Offset of the record header within the log
    pub offset: u64,

    /// Total record length: header + key + value
    pub length: u64,
}
