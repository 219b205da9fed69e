//! # Fragstream Core
//!
//! The feed engine for fragstream: a bounded in-memory window over the
//! most recently ingested records, with overflow archived into
//! size-capped, timestamp-named fragment files.
//!
//! ## Components
//!
//! - [`IngestionWindow`] - ordered, bounded buffer with FIFO eviction
//! - [`FragmentWriter`] - append-only persistence with lazy rotation
//! - [`FragmentIndex`] - binary search over timestamp-encoded file names
//! - [`Feed`] - ingestion plus live and historical reads, including
//!   conditional-request validators and redirect-to-canonical-time
//!   semantics
//!
//! ## Boundaries
//!
//! Record interpretation ([`RecordFormat`]), live fan-out
//! ([`PushTransport`]), and storage ([`fragstream_storage::FragmentStore`])
//! are traits supplied at construction. This crate ships one reference
//! implementation of each ([`LineFormat`], [`ChannelPush`]) so the system
//! is runnable end to end.
//!
//! ## Example
//!
//! ```rust
//! use fragstream_core::{Feed, FeedConfig, LineFormat, Record};
//! use fragstream_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let feed = Feed::new(
//!     FeedConfig::new().window_size(2),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(LineFormat::new()),
//!     "",
//! );
//! feed.ingest(&Record::from_text("2024-01-01T00:00:00Z hello")).unwrap();
//! assert_eq!(feed.window_len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod feed;
mod index;
mod paginate;
mod push;
mod record;
pub mod timestamp;
mod window;
mod writer;

pub use config::FeedConfig;
pub use error::{CoreError, CoreResult};
pub use feed::{CachePolicy, Feed, FragmentView, HistoryRead, LatestView, LiveRead};
pub use index::{locate_in, FragmentIndex, FragmentRef, Located};
pub use paginate::{page_links, PageLinks};
pub use push::{ChannelPush, PushError, PushTransport};
pub use record::{LineFormat, Record, RecordFormat};
pub use window::{IngestionWindow, WindowEntry};
pub use writer::FragmentWriter;
