//! # Fragstream Storage
//!
//! Fragment store trait and implementations for fragstream.
//!
//! This crate provides the lowest-level storage abstraction for fragstream:
//! a flat collection of **named, append-only files**. Stores are opaque
//! byte sinks - they do not interpret file names or contents. The core
//! crate owns the timestamp-encoded naming scheme and all formatting.
//!
//! ## Design Principles
//!
//! - Stores are simple named byte sinks (append, read, list)
//! - No knowledge of fragment naming, rotation, or record formats
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - For testing and ephemeral use
//! - [`DirStore`] - For persistent storage in a filesystem directory
//!
//! ## Example
//!
//! ```rust
//! use fragstream_storage::{FragmentStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.append("a.dat", b"hello").unwrap();
//! store.append("a.dat", b" world").unwrap();
//! assert_eq!(store.read("a.dat").unwrap(), b"hello world");
//! assert_eq!(store.list().unwrap(), vec!["a.dat".to_string()]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod dir;
mod error;
mod memory;
mod store;

pub use dir::DirStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::FragmentStore;
