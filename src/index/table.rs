//! Key index implementation
//!
//! HashMap-based index. Callers serialize access; no internal locking.

use std::collections::HashMap;

use super::IndexEntry;

/// Key → newest record location
#[derive(Debug, Default)]
pub struct KeyIndex {
    entries: HashMap<Vec<u8>, IndexEntry>,
}

impl KeyIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `key` at a newer record, returning the entry it replaces
    pub fn insert(&mut self, key: Vec<u8>, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, key: &[u8]) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Snapshot of every indexed key, in no particular order
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
