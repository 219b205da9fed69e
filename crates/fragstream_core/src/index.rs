//! Time-indexed fragment lookup.
//!
//! The index is derived, not stored: every lookup re-lists the store and
//! re-parses the timestamp-encoded file names. Fragment counts are small
//! relative to record counts, so this stays cheap, and it keeps the index
//! trivially consistent with rotation (worst case a lookup momentarily
//! misses the very newest fragment).

use crate::error::CoreResult;
use crate::timestamp::parse_fragment_file_name;
use chrono::{DateTime, Utc};
use fragstream_storage::FragmentStore;
use std::sync::Arc;
use tracing::warn;

/// One fragment boundary: the timestamp that names it and its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRef {
    /// The canonical boundary time encoded in the file name.
    pub timestamp: DateTime<Utc>,
    /// The file name in the store.
    pub file_name: String,
}

/// The result of locating a query time: the containing fragment and its
/// zero-based position in the chronologically sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The fragment whose span would contain the query time.
    pub fragment: FragmentRef,
    /// Zero-based index in the sorted boundary sequence.
    pub index: usize,
}

/// Lists and locates fragments in a store.
pub struct FragmentIndex {
    store: Arc<dyn FragmentStore>,
    ext: String,
}

impl FragmentIndex {
    /// Creates an index over the given store.
    pub fn new(store: Arc<dyn FragmentStore>, ext: impl Into<String>) -> Self {
        Self {
            store,
            ext: ext.into(),
        }
    }

    /// Returns all fragment boundaries, sorted ascending by timestamp.
    ///
    /// Files that do not follow the fragment naming scheme are skipped
    /// with a warning rather than failing the listing.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be listed.
    pub fn boundaries(&self) -> CoreResult<Vec<FragmentRef>> {
        let mut refs: Vec<FragmentRef> = self
            .store
            .list()?
            .into_iter()
            .filter_map(|name| match parse_fragment_file_name(&name, &self.ext) {
                Some(timestamp) => Some(FragmentRef {
                    timestamp,
                    file_name: name,
                }),
                None => {
                    warn!(file = %name, "skipping non-fragment file in store");
                    None
                }
            })
            .collect();
        // Name order already is chronological; sorting makes it explicit.
        refs.sort_by_key(|r| r.timestamp);
        Ok(refs)
    }

    /// Returns the number of fragments.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be listed.
    pub fn count(&self) -> CoreResult<usize> {
        Ok(self.boundaries()?.len())
    }

    /// Locates the fragment that would contain `query`.
    ///
    /// Returns `None` only when no fragments exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be listed.
    pub fn locate(&self, query: DateTime<Utc>) -> CoreResult<Option<Located>> {
        Ok(locate_in(&self.boundaries()?, query))
    }
}

impl std::fmt::Debug for FragmentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentIndex")
            .field("ext", &self.ext)
            .finish_non_exhaustive()
    }
}

/// Binary search over ascending boundaries for the greatest boundary
/// `<= query`.
///
/// Queries before the earliest boundary resolve to index 0: no fragment
/// exists for times before any data, so the earliest fragment is the
/// defined answer (boundary policy, not an error).
#[must_use]
pub fn locate_in(boundaries: &[FragmentRef], query: DateTime<Utc>) -> Option<Located> {
    if boundaries.is_empty() {
        return None;
    }
    let after = boundaries.partition_point(|r| r.timestamp <= query);
    let index = after.saturating_sub(1);
    Some(Located {
        fragment: boundaries[index].clone(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fragstream_storage::MemoryStore;
    use proptest::prelude::*;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn boundary(millis: i64) -> FragmentRef {
        FragmentRef {
            timestamp: ts(millis),
            file_name: crate::timestamp::fragment_file_name(ts(millis), "dat"),
        }
    }

    fn index_with(millis: &[i64]) -> FragmentIndex {
        let store = Arc::new(MemoryStore::new());
        for &m in millis {
            store
                .append(&crate::timestamp::fragment_file_name(ts(m), "dat"), b"x")
                .unwrap();
        }
        FragmentIndex::new(store, "dat")
    }

    #[test]
    fn boundaries_sorted_ascending() {
        let index = index_with(&[3_000, 1_000, 2_000]);
        let refs = index.boundaries().unwrap();

        let times: Vec<i64> = refs.iter().map(|r| r.timestamp.timestamp_millis()).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
    }

    #[test]
    fn foreign_files_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        store
            .append(&crate::timestamp::fragment_file_name(ts(1_000), "dat"), b"x")
            .unwrap();
        store.append("README.md", b"docs").unwrap();
        store.append("notes.dat", b"not a timestamp").unwrap();

        let index = FragmentIndex::new(store, "dat");
        assert_eq!(index.count().unwrap(), 1);
    }

    #[test]
    fn locate_exact_boundary() {
        let index = index_with(&[1_000, 2_000, 3_000]);

        let located = index.locate(ts(2_000)).unwrap().unwrap();
        assert_eq!(located.index, 1);
        assert_eq!(located.fragment.timestamp, ts(2_000));
    }

    #[test]
    fn locate_between_boundaries_picks_earlier() {
        let index = index_with(&[1_000, 2_000, 3_000]);

        let located = index.locate(ts(2_500)).unwrap().unwrap();
        assert_eq!(located.index, 1);
        assert_eq!(located.fragment.timestamp, ts(2_000));
    }

    #[test]
    fn locate_after_last_picks_last() {
        let index = index_with(&[1_000, 2_000, 3_000]);

        let located = index.locate(ts(99_000)).unwrap().unwrap();
        assert_eq!(located.index, 2);
    }

    #[test]
    fn locate_before_earliest_clamps_to_first() {
        let index = index_with(&[1_000, 2_000, 3_000]);

        let located = index.locate(ts(0)).unwrap().unwrap();
        assert_eq!(located.index, 0);
        assert_eq!(located.fragment.timestamp, ts(1_000));
    }

    #[test]
    fn locate_with_no_fragments() {
        let index = index_with(&[]);
        assert!(index.locate(ts(1_000)).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn locate_returns_greatest_boundary_at_or_before_query(
            millis in proptest::collection::btree_set(0i64..1_000_000, 1..20),
            query in 0i64..1_000_000,
        ) {
            let sorted: Vec<i64> = millis.iter().copied().collect();
            let boundaries: Vec<FragmentRef> = sorted.iter().map(|&m| boundary(m)).collect();

            let located = locate_in(&boundaries, ts(query)).unwrap();
            let expected = sorted
                .iter()
                .rev()
                .find(|&&b| b <= query)
                .copied()
                .unwrap_or(sorted[0]);

            prop_assert_eq!(located.fragment.timestamp.timestamp_millis(), expected);
            prop_assert_eq!(
                boundaries[located.index].timestamp,
                located.fragment.timestamp
            );
        }
    }
}
