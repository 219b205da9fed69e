//! Fragment store trait definition.

use crate::error::StorageResult;

/// A low-level store of named, append-only files.
///
/// Fragment stores are **opaque byte sinks**. They provide simple
/// operations for appending to, reading, and listing named files in a
/// flat namespace. Fragstream owns all naming and format interpretation -
/// stores do not understand fragments, timestamps, or records.
///
/// # Invariants
///
/// - `append` creates the file when it does not exist yet
/// - `read` returns exactly the concatenation of all previous appends
/// - `list` returns names in ascending lexicographic order
/// - Stores must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::DirStore`] - For persistent storage
pub trait FragmentStore: Send + Sync {
    /// Appends bytes to the named file, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not usable or an I/O error occurs.
    /// On error, none of `data` is considered written.
    fn append(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Reads the full contents of the named file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::NotFound`] if the file does not
    /// exist, or an error if an I/O error occurs.
    fn read(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Lists all file names in the store, ascending lexicographically.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Returns whether the named file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}
