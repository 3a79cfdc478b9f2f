//! Append-Only Log Module
//!
//! The single source of truth for the store.
//!
//! ## Responsibilities
//! - Encode and decode records
//! - Append records at the end of the file
//! - Positioned reads of a single record
//! - Sequential replay to rebuild the index
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Record 1                                                     │
//! │ ┌───────────┬─────────┬─────────┬──────┬───────┬─────────┐ │
//! │ │ TS (4)    │ KLen(4) │ VLen(4) │ T(1) │  Key  │  Value  │ │
//! │ └───────────┴─────────┴─────────┴──────┴───────┴─────────┘ │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record 2 ...                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//! Integers are big-endian. `T` is 1 for a tombstone, 0 otherwise.
//! No separators, no checksum; end of file is the only terminator.

pub mod record;
mod reader;
mod writer;
mod recovery;

pub use record::{LogRecord, RecordHeader, HEADER_SIZE};
pub use reader::{LogIterator, LogReader, ScannedKey};
pub use writer::LogWriter;
pub use recovery::{LogRecovery, ReplayStats};
