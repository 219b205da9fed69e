//! In-memory fragment store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::FragmentStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory fragment store.
///
/// This store keeps all files in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral feeds that don't need persistence
///
/// Listing order falls out of the `BTreeMap` key order, which matches the
/// ascending lexicographic contract of [`FragmentStore::list`].
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use fragstream_storage::{FragmentStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.append("f.dat", b"data").unwrap();
/// assert!(store.exists("f.dat").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files in the store.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Clears all files from the store.
    pub fn clear(&self) {
        self.files.write().clear();
    }
}

impl FragmentStore for MemoryStore {
    fn append(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        if name.is_empty() {
            return Err(StorageError::invalid_name(name));
        }
        let mut files = self.files.write();
        files.entry(name.to_owned()).or_default().extend_from_slice(data);
        Ok(())
    }

    fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let files = self.files.read();
        files
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::not_found(name))
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.files.read().keys().cloned().collect())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.files.read().contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.file_count(), 0);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn memory_append_creates_file() {
        let store = MemoryStore::new();
        store.append("a.dat", b"hello").unwrap();

        assert!(store.exists("a.dat").unwrap());
        assert_eq!(store.read("a.dat").unwrap(), b"hello");
    }

    #[test]
    fn memory_append_concatenates() {
        let store = MemoryStore::new();
        store.append("a.dat", b"hello").unwrap();
        store.append("a.dat", b" world").unwrap();

        assert_eq!(store.read("a.dat").unwrap(), b"hello world");
    }

    #[test]
    fn memory_read_missing_fails() {
        let store = MemoryStore::new();
        let result = store.read("missing.dat");
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn memory_empty_name_rejected() {
        let store = MemoryStore::new();
        let result = store.append("", b"data");
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[test]
    fn memory_list_is_sorted() {
        let store = MemoryStore::new();
        store.append("c.dat", b"3").unwrap();
        store.append("a.dat", b"1").unwrap();
        store.append("b.dat", b"2").unwrap();

        assert_eq!(store.list().unwrap(), vec!["a.dat", "b.dat", "c.dat"]);
    }

    #[test]
    fn memory_clear() {
        let store = MemoryStore::new();
        store.append("a.dat", b"x").unwrap();
        store.clear();
        assert_eq!(store.file_count(), 0);
        assert!(!store.exists("a.dat").unwrap());
    }

    #[test]
    fn memory_empty_append_creates_empty_file() {
        let store = MemoryStore::new();
        store.append("a.dat", b"").unwrap();
        assert!(store.exists("a.dat").unwrap());
        assert!(store.read("a.dat").unwrap().is_empty());
    }
}
