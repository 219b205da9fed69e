//! Bounded in-memory ingestion window.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// One windowed record: raw payload, serialized form, event time.
///
/// Owned exclusively by the window while in memory; moved out to the
/// fragment writer on eviction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    /// Raw payload as ingested.
    pub raw: Vec<u8>,
    /// Serialized form produced by the record format.
    pub serialized: String,
    /// Event time of the record.
    pub timestamp: DateTime<Utc>,
}

/// An ordered, bounded buffer of the most recently ingested records.
///
/// New entries are appended at the tail; when the buffer exceeds its
/// capacity the oldest entry is evicted from the head (FIFO). A
/// materialized concatenation of all windowed serialized forms is kept
/// current on every mutation so live reads never re-serialize.
///
/// The length exceeds the capacity only transiently inside [`push`],
/// between the append and the eviction.
///
/// [`push`]: IngestionWindow::push
#[derive(Debug)]
pub struct IngestionWindow {
    entries: VecDeque<WindowEntry>,
    capacity: usize,
    materialized: String,
}

impl IngestionWindow {
    /// Creates an empty window holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
            materialized: String::new(),
        }
    }

    /// Appends an entry, evicting and returning the oldest entry when
    /// the window would otherwise exceed its capacity.
    pub fn push(&mut self, entry: WindowEntry) -> Option<WindowEntry> {
        self.entries.push_back(entry);
        let evicted = if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.rebuild_materialized();
        evicted
    }

    /// Returns the newest entry, if any.
    #[must_use]
    pub fn newest(&self) -> Option<&WindowEntry> {
        self.entries.back()
    }

    /// Returns the materialized concatenation of all windowed entries.
    #[must_use]
    pub fn materialized(&self) -> &str {
        &self.materialized
    }

    /// Returns the number of windowed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rebuild_materialized(&mut self) {
        let total: usize = self.entries.iter().map(|e| e.serialized.len()).sum();
        let mut view = String::with_capacity(total);
        for entry in &self.entries {
            view.push_str(&entry.serialized);
        }
        self.materialized = view;
    }
}
