//! Minimal framework-independent HTTP response representation.

/// Header names used by the feed endpoints.
pub mod header {
    /// Response validator for conditional requests.
    pub const ETAG: &str = "ETag";
    /// Last modification marker.
    pub const LAST_MODIFIED: &str = "Last-Modified";
    /// Cache directives.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Redirect target.
    pub const LOCATION: &str = "Location";
    /// Body media type.
    pub const CONTENT_TYPE: &str = "Content-Type";
}

/// An HTTP response independent of any particular server framework.
///
/// The embedding application copies status, headers, and body into its
/// router's native response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers in insertion order.
    pub headers: Vec<(&'static str, String)>,
    /// Response body, absent for 302/304/404.
    pub body: Option<String>,
}

impl HttpResponse {
    /// 200 with a body.
    #[must_use]
    pub fn ok(body: String) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// 302 to the given location.
    #[must_use]
    pub fn redirect(location: String) -> Self {
        Self {
            status: 302,
            headers: vec![(header::LOCATION, location)],
            body: None,
        }
    }

    /// 304, validators to be attached by the caller.
    #[must_use]
    pub fn not_modified() -> Self {
        Self {
            status: 304,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 404 without a body.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 500 without details; the cause is logged server-side.
    #[must_use]
    pub fn server_error() -> Self {
        Self {
            status: 500,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attaches a header.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Returns the first value of the named header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
