//! Fragment writer: append-only persistence with size-capped rotation.

use crate::error::{CoreError, CoreResult};
use crate::timestamp::fragment_file_name;
use chrono::{DateTime, Utc};
use fragstream_storage::FragmentStore;
use std::sync::Arc;
use tracing::debug;

/// Appends serialized records to the open fragment file, rotating to a
/// new timestamp-named file once the byte cap is exceeded.
///
/// Rotation is lazy: it is checked only when a record is stored, never on
/// a timer. A fragment's name is fixed at creation - it is the event time
/// of the first record stored after rotation - and never renamed.
///
/// The byte counter reflects only successful appends; a failed append
/// leaves it untouched so retries do not over-count.
pub struct FragmentWriter {
    store: Arc<dyn FragmentStore>,
    ext: String,
    max_bytes: u64,
    open: Option<String>,
    bytes_written: u64,
}

impl FragmentWriter {
    /// Creates a writer over the given store.
    pub fn new(store: Arc<dyn FragmentStore>, ext: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            store,
            ext: ext.into(),
            max_bytes,
            open: None,
            bytes_written: 0,
        }
    }

    /// Stores one serialized payload, rotating first if needed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the append fails; the byte counter is
    /// not advanced in that case.
    pub fn store(&mut self, payload: &str, timestamp: DateTime<Utc>) -> CoreResult<()> {
        let rotate = match &self.open {
            None => true,
            Some(_) => self.bytes_written > self.max_bytes,
        };

        let name = if rotate {
            let name = fragment_file_name(timestamp, &self.ext);
            debug!(fragment = %name, "rotating to new fragment");
            self.open = Some(name.clone());
            self.bytes_written = 0;
            name
        } else {
            self.open
                .clone()
                .ok_or_else(|| CoreError::invalid_state("no open fragment"))?
        };

        self.store.append(&name, payload.as_bytes())?;
        self.bytes_written += payload.len() as u64;
        Ok(())
    }

    /// Returns the name of the currently open fragment, if any.
    #[must_use]
    pub fn open_fragment(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Returns the bytes written to the open fragment so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl std::fmt::Debug for FragmentWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentWriter")
            .field("ext", &self.ext)
            .field("max_bytes", &self.max_bytes)
            .field("open", &self.open)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fragstream_storage::{MemoryStore, StorageError, StorageResult};

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn writer(max_bytes: u64) -> (Arc<MemoryStore>, FragmentWriter) {
        let store = Arc::new(MemoryStore::new());
        let w = FragmentWriter::new(store.clone(), "dat", max_bytes);
        (store, w)
    }

    #[test]
    fn first_store_opens_fragment_named_by_timestamp() {
        let (store, mut writer) = writer(1024);

        writer.store("a\n", ts(1_000)).unwrap();

        assert_eq!(
            writer.open_fragment(),
            Some("1970-01-01T00:00:01.000Z.dat")
        );
        assert_eq!(writer.bytes_written(), 2);
        assert_eq!(store.read("1970-01-01T00:00:01.000Z.dat").unwrap(), b"a\n");
    }

    #[test]
    fn below_cap_appends_to_same_fragment() {
        let (store, mut writer) = writer(1024);

        writer.store("a\n", ts(1_000)).unwrap();
        writer.store("b\n", ts(2_000)).unwrap();
        writer.store("c\n", ts(3_000)).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(
            store.read("1970-01-01T00:00:01.000Z.dat").unwrap(),
            b"a\nb\nc\n"
        );
        assert_eq!(writer.bytes_written(), 6);
    }

    #[test]
    fn exceeding_cap_rotates() {
        // Cap of 3: rotation triggers once the counter exceeds 3.
        let (store, mut writer) = writer(3);

        writer.store("aa\n", ts(1_000)).unwrap(); // counter 3
        writer.store("bb\n", ts(2_000)).unwrap(); // counter 6, no rotation yet
        writer.store("cc\n", ts(3_000)).unwrap(); // counter > cap: new fragment

        let names = store.list().unwrap();
        assert_eq!(
            names,
            vec![
                "1970-01-01T00:00:01.000Z.dat",
                "1970-01-01T00:00:03.000Z.dat"
            ]
        );
        assert_eq!(store.read(&names[0]).unwrap(), b"aa\nbb\n");
        assert_eq!(store.read(&names[1]).unwrap(), b"cc\n");
        assert_eq!(writer.bytes_written(), 3);
    }

    #[test]
    fn fragment_names_are_monotonic() {
        let (store, mut writer) = writer(0); // every record rotates

        for i in 1..=5 {
            writer.store("x\n", ts(i * 1_000)).unwrap();
        }

        let names = store.list().unwrap();
        assert_eq!(names.len(), 5);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    struct FailingStore;

    impl FragmentStore for FailingStore {
        fn append(&self, _name: &str, _data: &[u8]) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
        fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::not_found(name))
        }
        fn list(&self) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn exists(&self, _name: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn failed_append_does_not_advance_counter() {
        let mut writer = FragmentWriter::new(Arc::new(FailingStore), "dat", 1024);

        let result = writer.store("payload\n", ts(1_000));
        assert!(result.is_err());
        assert_eq!(writer.bytes_written(), 0);

        // The chosen name survives; a later retry appends into the same
        // fragment rather than inventing a new one.
        assert_eq!(
            writer.open_fragment(),
            Some("1970-01-01T00:00:01.000Z.dat")
        );
    }
}
