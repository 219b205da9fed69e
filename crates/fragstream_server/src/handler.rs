//! Request handlers for the feed endpoints.

use crate::response::{header, HttpResponse};
use chrono::{DateTime, Utc};
use fragstream_core::{CachePolicy, Feed, HistoryRead, LiveRead};
use std::sync::Arc;
use tracing::error;

/// Superseded fragments never change again.
const CACHE_IMMUTABLE: &str = "public, max-age=604800, immutable";
/// The newest fragment may still receive appends.
const CACHE_VOLATILE: &str = "no-store, no-cache, must-revalidate";
/// The live view is revalidated per request via its validator.
const CACHE_LIVE: &str = "no-cache";

/// Handler for feed requests.
///
/// One method per endpoint; the embedding application routes requests
/// here and translates [`HttpResponse`] into its framework's response
/// type.
pub struct FeedHandler {
    feed: Arc<Feed>,
}

impl FeedHandler {
    /// Creates a handler over the given feed.
    pub fn new(feed: Arc<Feed>) -> Self {
        Self { feed }
    }

    /// Handles `GET latest`.
    ///
    /// 404 when nothing has been ingested; 304 when the caller's
    /// `If-None-Match` validator is current; 200 with `ETag`,
    /// `Last-Modified`, and `Content-Type` otherwise.
    pub fn get_latest(&self, if_none_match: Option<&str>) -> HttpResponse {
        match self.feed.latest(if_none_match) {
            Ok(LiveRead::NoData) => HttpResponse::not_found(),
            Ok(LiveRead::NotModified {
                etag,
                last_modified,
            }) => HttpResponse::not_modified()
                .with_header(header::ETAG, etag)
                .with_header(header::LAST_MODIFIED, http_date(last_modified)),
            Ok(LiveRead::Full(view)) => HttpResponse::ok(view.body)
                .with_header(header::CONTENT_TYPE, self.feed.content_type().to_owned())
                .with_header(header::ETAG, view.etag)
                .with_header(header::LAST_MODIFIED, http_date(view.last_modified))
                .with_header(header::CACHE_CONTROL, CACHE_LIVE.to_owned()),
            Err(e) => {
                error!(error = %e, "latest read failed");
                HttpResponse::server_error()
            }
        }
    }

    /// Handles `GET fragments?time=<timestamp>`.
    ///
    /// 302 to the canonical time for invalid, missing, or non-boundary
    /// times; 404 when no fragments exist; otherwise 200 with a cache
    /// policy reflecting whether the fragment is still mutable.
    pub fn get_fragment(&self, time: Option<&str>) -> HttpResponse {
        match self.feed.fragment(time) {
            Ok(HistoryRead::Redirect(ts)) => {
                HttpResponse::redirect(self.feed.fragment_uri(ts))
            }
            Ok(HistoryRead::NotFound) => HttpResponse::not_found(),
            Ok(HistoryRead::View(view)) => {
                let cache = match view.cache {
                    CachePolicy::Immutable => CACHE_IMMUTABLE,
                    CachePolicy::NoCache => CACHE_VOLATILE,
                };
                HttpResponse::ok(view.body)
                    .with_header(header::CONTENT_TYPE, self.feed.content_type().to_owned())
                    .with_header(header::CACHE_CONTROL, cache.to_owned())
            }
            Err(e) => {
                error!(error = %e, "fragment read failed");
                HttpResponse::server_error()
            }
        }
    }
}

impl std::fmt::Debug for FeedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedHandler").finish_non_exhaustive()
    }
}

/// Renders a timestamp as an RFC 7231 HTTP-date.
fn http_date(ts: DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
