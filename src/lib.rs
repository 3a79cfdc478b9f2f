//! # TideKV
//!
//! An embedded, log-structured key-value store with:
//! - A single append-only log as the only on-disk state
//! - An in-memory index rebuilt by replaying the log on open
//! - Tombstone records for deletes, kept in the index
//! - One global lock serializing every operation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Store (set/get/delete)                     │
//! │                  (one global critical section)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     Log     │◄─────────│    Index    │
//!   │  (Append)   │  offset  │  (HashMap)  │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          └──────── replay ────────┘
//!                   (on open)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tidekv::Store;
//!
//! let store = Store::open("./data/tide.log")?;
//! store.set(b"hello", b"world")?;
//! assert_eq!(store.get(b"hello")?.as_deref(), Some(&b"world"[..]));
//! store.delete(b"hello")?;
//! assert_eq!(store.get(b"hello")?, None);
//! # Ok::<(), tidekv::TideError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TideError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::{LogStore, Store};
pub use index::IndexEntry;
pub use log::ReplayStats;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TideKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
