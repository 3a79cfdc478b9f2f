//! Tests for the KeyIndex
//!
//! These tests verify:
//! - Insert/get/contains
//! - Overwrite keeps one entry per key
//! - Keys snapshot

use std::collections::HashSet;

use tidekv::index::{IndexEntry, KeyIndex};

fn entry(offset: u64, length: u64) -> IndexEntry {
    IndexEntry {
        timestamp: 0,
        offset,
        length,
    }
}

#[test]
fn test_new_index_is_empty() {
    let index = KeyIndex::new();

    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert!(index.keys().is_empty());
}

#[test]
fn test_insert_and_get() {
    let mut index = KeyIndex::new();

    assert_eq!(index.insert(b"key".to_vec(), entry(0, 20)), None);

    assert!(index.contains(b"key"));
    assert!(!index.contains(b"other"));
    assert_eq!(index.get(b"key"), Some(&entry(0, 20)));
    assert_eq!(index.get(b"other"), None);
}

#[test]
fn test_insert_overwrites() {
    let mut index = KeyIndex::new();
    index.insert(b"key".to_vec(), entry(0, 20));

    let previous = index.insert(b"key".to_vec(), entry(20, 16));

    assert_eq!(previous, Some(entry(0, 20)));
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(b"key").unwrap().offset, 20);
}

#[test]
fn test_empty_key() {
    let mut index = KeyIndex::new();
    index.insert(Vec::new(), entry(0, 13));

    assert!(index.contains(b""));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_keys_snapshot() {
    let mut index = KeyIndex::new();
    index.insert(b"a".to_vec(), entry(0, 15));
    index.insert(b"b".to_vec(), entry(15, 15));
    index.insert(b"a".to_vec(), entry(30, 15));

    let keys: HashSet<Vec<u8>> = index.keys().into_iter().collect();
    index.insert(b"c".to_vec(), entry(45, 15));

    assert_eq!(keys, HashSet::from([b"a".to_vec(), b"b".to_vec()]));
    assert_eq!(index.len(), 3);
}
