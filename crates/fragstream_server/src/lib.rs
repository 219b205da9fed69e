//! # Fragstream Server
//!
//! HTTP-shaped boundary for fragstream feeds.
//!
//! This crate turns [`fragstream_core::Feed`] read outcomes into
//! status/header/body responses: conditional requests (`ETag` /
//! `Last-Modified`) for the live view, `Cache-Control` policies and
//! `Location` redirects for historical fragments.
//!
//! It deliberately carries no HTTP framework. [`FeedHandler`] exposes
//! one method per endpoint; a real application registers routes with
//! whatever router it uses and forwards the relevant request parts:
//!
//! ```rust,ignore
//! // GET /feed/latest
//! let response = handler.get_latest(req.header("if-none-match"));
//! // GET /feed/fragments?time=...
//! let response = handler.get_fragment(req.query("time"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod handler;
mod response;

pub use handler::FeedHandler;
pub use response::{header, HttpResponse};
