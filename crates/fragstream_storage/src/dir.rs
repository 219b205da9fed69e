//! Directory-backed fragment store for persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::store::FragmentStore;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A fragment store backed by a flat filesystem directory.
///
/// Each named file maps to a regular file directly under the store's
/// directory. Appends use the OS append mode, so a file's contents are
/// always the concatenation of successful appends in order.
///
/// File names must be plain names: path separators and `..` are rejected
/// so a caller cannot escape the store directory.
///
/// # Thread Safety
///
/// This store is thread-safe. Each append opens the file in append mode
/// and performs a single `write_all`; fragstream guarantees a single
/// writer per file, so no cross-process coordination is attempted.
///
/// # Example
///
/// ```no_run
/// use fragstream_storage::{FragmentStore, DirStore};
/// use std::path::Path;
///
/// let store = DirStore::open(Path::new("fragments")).unwrap();
/// store.append("2024-01-01T00:00:00.000Z.dat", b"record\n").unwrap();
/// ```
#[derive(Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Opens a store over the given directory, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or if the
    /// path exists and is not a directory.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        if !dir.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a directory: {}", dir.display()),
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Returns the store's directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name == "."
            || name == ".."
        {
            return Err(StorageError::invalid_name(name));
        }
        Ok(self.dir.join(name))
    }
}

impl FragmentStore for DirStore {
    fn append(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(name)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(data)?;
        Ok(())
    }

    fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(name)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(name))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.resolve(name)?;
        Ok(path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dir_open_creates_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("fragments");

        assert!(!path.exists());
        let store = DirStore::open(&path).unwrap();
        assert!(path.is_dir());
        assert_eq!(store.dir(), path);
    }

    #[test]
    fn dir_append_and_read() {
        let temp = tempdir().unwrap();
        let store = DirStore::open(temp.path()).unwrap();

        store.append("a.dat", b"hello").unwrap();
        store.append("a.dat", b" world").unwrap();

        assert_eq!(store.read("a.dat").unwrap(), b"hello world");
    }

    #[test]
    fn dir_read_missing_fails() {
        let temp = tempdir().unwrap();
        let store = DirStore::open(temp.path()).unwrap();

        let result = store.read("missing.dat");
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn dir_list_is_sorted_and_skips_subdirs() {
        let temp = tempdir().unwrap();
        let store = DirStore::open(temp.path()).unwrap();

        store.append("b.dat", b"2").unwrap();
        store.append("a.dat", b"1").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        assert_eq!(store.list().unwrap(), vec!["a.dat", "b.dat"]);
    }

    #[test]
    fn dir_rejects_path_traversal() {
        let temp = tempdir().unwrap();
        let store = DirStore::open(temp.path()).unwrap();

        for name in ["", ".", "..", "a/b.dat", "..\\evil"] {
            let result = store.append(name, b"x");
            assert!(
                matches!(result, Err(StorageError::InvalidName { .. })),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn dir_exists() {
        let temp = tempdir().unwrap();
        let store = DirStore::open(temp.path()).unwrap();

        assert!(!store.exists("a.dat").unwrap());
        store.append("a.dat", b"x").unwrap();
        assert!(store.exists("a.dat").unwrap());
    }

    #[test]
    fn dir_persistence_across_reopen() {
        let temp = tempdir().unwrap();

        {
            let store = DirStore::open(temp.path()).unwrap();
            store.append("a.dat", b"persistent").unwrap();
        }

        let store = DirStore::open(temp.path()).unwrap();
        assert_eq!(store.read("a.dat").unwrap(), b"persistent");
    }
}
