//! The feed: ingestion, live reads, and historical reads, tied together.

use crate::config::FeedConfig;
use crate::error::{CoreError, CoreResult};
use crate::index::{locate_in, FragmentIndex};
use crate::paginate::page_links;
use crate::push::PushTransport;
use crate::record::{Record, RecordFormat};
use crate::timestamp::{format_ts, truncate_ms};
use crate::window::{IngestionWindow, WindowEntry};
use crate::writer::FragmentWriter;
use chrono::{DateTime, Utc};
use fragstream_storage::FragmentStore;
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache policy decided for a historical fragment response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// The fragment is superseded and will never change again.
    Immutable,
    /// The fragment is the newest one and may still receive appends.
    NoCache,
}

/// A successfully resolved historical fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentView {
    /// The canonical boundary time of the fragment.
    pub timestamp: DateTime<Utc>,
    /// Full response body: preamble, fragment content, pagination.
    pub body: String,
    /// Cache policy for the response.
    pub cache: CachePolicy,
    /// Link to the previous fragment, absent for the earliest one.
    pub previous: Option<String>,
}

/// Outcome of a historical read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRead {
    /// The caller should redirect to the canonical time.
    ///
    /// Produced both for invalid/missing query times (redirect to now)
    /// and for valid times that are not exactly a fragment boundary.
    Redirect(DateTime<Utc>),
    /// No fragments exist yet.
    NotFound,
    /// The fragment named by the query time, with its cache policy.
    View(FragmentView),
}

/// A full live response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestView {
    /// Weak validator over the newest raw payload.
    pub etag: String,
    /// Event time of the newest windowed record.
    pub last_modified: DateTime<Utc>,
    /// Full response body: preamble, windowed content, pagination.
    pub body: String,
}

/// Outcome of a live read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveRead {
    /// Nothing has been ingested yet.
    NoData,
    /// The caller's validator matches; no body needed.
    NotModified {
        /// Current validator.
        etag: String,
        /// Event time of the newest windowed record.
        last_modified: DateTime<Utc>,
    },
    /// A full response.
    Full(LatestView),
}

/// Single-slot cache of the last full live response.
#[derive(Debug)]
struct CachedLatest {
    etag: String,
    body: String,
}

/// State mutated by the ingestion path.
///
/// Window mutation, eviction, and fragment rotation all happen under one
/// write lock so evictions reach storage in timestamp order and the byte
/// counter stays consistent with the open fragment.
#[derive(Debug)]
struct FeedState {
    window: IngestionWindow,
    writer: FragmentWriter,
}

/// A continuously fed record stream with a bounded live window and
/// size-capped, timestamp-named fragment archive.
///
/// # Concurrency
///
/// Ingestion is serialized through a write lock. Live and historical
/// reads take the read lock (or none at all for purely storage-backed
/// reads) and observe a consistent window snapshot. A historical read
/// racing a rotation can momentarily miss the very newest fragment;
/// fragments are immutable once superseded, so this is acceptable
/// staleness rather than an inconsistency.
pub struct Feed {
    config: FeedConfig,
    store: Arc<dyn FragmentStore>,
    format: Arc<dyn RecordFormat>,
    push: Option<Arc<dyn PushTransport>>,
    preamble: String,
    index: FragmentIndex,
    state: RwLock<FeedState>,
    live_cache: Mutex<Option<CachedLatest>>,
}

impl Feed {
    /// Creates a feed over the given store and record format.
    ///
    /// `preamble` is a fixed block of formatted content prepended to
    /// every response body; it is loaded once, here.
    pub fn new(
        config: FeedConfig,
        store: Arc<dyn FragmentStore>,
        format: Arc<dyn RecordFormat>,
        preamble: impl Into<String>,
    ) -> Self {
        let index = FragmentIndex::new(store.clone(), config.fragment_ext.clone());
        let writer = FragmentWriter::new(
            store.clone(),
            config.fragment_ext.clone(),
            config.max_fragment_bytes,
        );
        let window = IngestionWindow::new(config.window_size);
        Self {
            config,
            store,
            format,
            push: None,
            preamble: preamble.into(),
            index,
            state: RwLock::new(FeedState { window, writer }),
            live_cache: Mutex::new(None),
        }
    }

    /// Attaches a live push transport.
    #[must_use]
    pub fn with_push(mut self, push: Arc<dyn PushTransport>) -> Self {
        self.push = Some(push);
        self
    }

    /// Returns the feed configuration.
    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Media type of response bodies, from the record format.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// The canonical URI of the fragment named by `ts`.
    #[must_use]
    pub fn fragment_uri(&self, ts: DateTime<Utc>) -> String {
        format!("{}?time={}", self.config.base_uri, format_ts(ts))
    }

    /// Returns the number of records currently windowed.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.state.read().window.len()
    }

    /// Ingests one record.
    ///
    /// The record's event time is extracted, the record is serialized and
    /// windowed, the serialized form is offered to the push transport
    /// (best-effort), and if the window overflows the oldest entry is
    /// evicted to the fragment writer.
    ///
    /// # Errors
    ///
    /// [`CoreError::MalformedRecord`] rejects this record only; the feed
    /// remains usable. A storage error on eviction fails this call after
    /// the record was windowed.
    pub fn ingest(&self, record: &Record) -> CoreResult<()> {
        let timestamp = truncate_ms(self.format.event_time(record)?);
        let serialized = self.format.serialize(record)?;

        let mut state = self.state.write();
        debug!(ts = %format_ts(timestamp), "ingesting record");

        let evicted = state.window.push(WindowEntry {
            raw: record.payload.clone(),
            serialized: serialized.clone(),
            timestamp,
        });

        if let Some(push) = &self.push {
            if let Err(e) = push.publish(&self.config.stream_name, &serialized) {
                warn!(error = %e, "live push failed; record is ingested regardless");
            }
        }

        if let Some(entry) = evicted {
            state.writer.store(&entry.serialized, entry.timestamp)?;
        }
        Ok(())
    }

    /// Ingests an ordered sequence of records, one at a time in order.
    ///
    /// Malformed records are rejected individually (logged, skipped);
    /// ingestion of subsequent records continues. Returns the number of
    /// records accepted.
    ///
    /// # Errors
    ///
    /// Storage errors abort the batch; records already ingested stay
    /// ingested.
    pub fn ingest_all(&self, records: &[Record]) -> CoreResult<usize> {
        let mut accepted = 0;
        for record in records {
            match self.ingest(record) {
                Ok(()) => accepted += 1,
                Err(CoreError::MalformedRecord { message }) => {
                    warn!(%message, "rejecting malformed record");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(accepted)
    }

    /// Serves the live view with conditional-request semantics.
    ///
    /// The validator is a weak ETag over the newest entry's raw payload;
    /// the last-modified marker is the newest entry's event time. When
    /// the validator matches the previous full response, the cached body
    /// is re-served without recomputing it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if pagination metadata cannot be derived.
    pub fn latest(&self, if_none_match: Option<&str>) -> CoreResult<LiveRead> {
        let (etag, last_modified, window_view) = {
            let state = self.state.read();
            let Some(newest) = state.window.newest() else {
                return Ok(LiveRead::NoData);
            };
            (
                weak_etag(&newest.raw),
                newest.timestamp,
                state.window.materialized().to_owned(),
            )
        };

        if if_none_match.is_some_and(|v| v.trim() == etag) {
            return Ok(LiveRead::NotModified {
                etag,
                last_modified,
            });
        }

        let mut cache = self.live_cache.lock();
        if let Some(cached) = cache.as_ref() {
            if cached.etag == etag {
                return Ok(LiveRead::Full(LatestView {
                    etag,
                    last_modified,
                    body: cached.body.clone(),
                }));
            }
        }

        let boundaries = self.index.boundaries()?;
        // The live view is the pseudo-fragment one past the newest on
        // disk, so its index is the fragment count.
        let links = page_links(&self.config.base_uri, &boundaries, boundaries.len());

        let mut body =
            String::with_capacity(self.preamble.len() + window_view.len() + 64);
        body.push_str(&self.preamble);
        body.push_str(&window_view);
        body.push_str(&links.render());

        *cache = Some(CachedLatest {
            etag: etag.clone(),
            body: body.clone(),
        });

        Ok(LiveRead::Full(LatestView {
            etag,
            last_modified,
            body,
        }))
    }

    /// Serves a historical fragment by query time.
    ///
    /// Invalid or missing times redirect to now; valid times that are not
    /// exactly a fragment boundary redirect to the canonical boundary
    /// time, so every valid query maps to exactly one canonical URI.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the fragment cannot be listed or read.
    pub fn fragment(&self, query_time: Option<&str>) -> CoreResult<HistoryRead> {
        let Some(query) = query_time.and_then(crate::timestamp::parse_ts) else {
            return Ok(HistoryRead::Redirect(truncate_ms(Utc::now())));
        };

        let boundaries = self.index.boundaries()?;
        let Some(located) = locate_in(&boundaries, query) else {
            return Ok(HistoryRead::NotFound);
        };

        if located.fragment.timestamp != query {
            return Ok(HistoryRead::Redirect(located.fragment.timestamp));
        }

        let content = self.store.read(&located.fragment.file_name)?;
        let content = String::from_utf8_lossy(&content);
        let links = page_links(&self.config.base_uri, &boundaries, located.index);
        let newest = located.index + 1 == boundaries.len();

        let mut body =
            String::with_capacity(self.preamble.len() + content.len() + 64);
        body.push_str(&self.preamble);
        body.push_str(&content);
        body.push_str(&links.render());

        Ok(HistoryRead::View(FragmentView {
            timestamp: located.fragment.timestamp,
            body,
            cache: if newest {
                CachePolicy::NoCache
            } else {
                CachePolicy::Immutable
            },
            previous: links.previous,
        }))
    }
}

impl std::fmt::Debug for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("config", &self.config)
            .field("window_len", &self.window_len())
            .finish_non_exhaustive()
    }
}

/// Weak ETag: first 8 bytes of SHA-256 over the raw payload, hex-encoded.
fn weak_etag(raw: &[u8]) -> String {
    let digest = Sha256::digest(raw);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    format!("W/\"{:016x}\"", u64::from_be_bytes(prefix))
}
