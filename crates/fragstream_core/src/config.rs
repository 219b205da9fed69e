//! Feed configuration.

/// Configuration for a [`crate::Feed`].
///
/// Constructed once and never mutated; counters and caches live in the
/// feed's internal state, not here.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum number of records held in the in-memory window.
    pub window_size: usize,

    /// Maximum bytes written to a fragment before rotation.
    pub max_fragment_bytes: u64,

    /// File extension for fragment files (without the dot).
    pub fragment_ext: String,

    /// Canonical URI of the fragments resource, used in redirects and
    /// pagination links (e.g. `https://example.org/feed/fragments`).
    pub base_uri: String,

    /// Stream name used as the topic key for live pushes.
    pub stream_name: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            max_fragment_bytes: 1024 * 1024, // 1 MiB
            fragment_ext: "dat".to_owned(),
            base_uri: "/fragments".to_owned(),
            stream_name: "feed".to_owned(),
        }
    }
}

impl FeedConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window size.
    #[must_use]
    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Sets the fragment rotation cap in bytes.
    #[must_use]
    pub fn max_fragment_bytes(mut self, bytes: u64) -> Self {
        self.max_fragment_bytes = bytes;
        self
    }

    /// Sets the fragment file extension.
    #[must_use]
    pub fn fragment_ext(mut self, ext: impl Into<String>) -> Self {
        self.fragment_ext = ext.into();
        self
    }

    /// Sets the canonical fragments resource URI.
    #[must_use]
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = uri.into();
        self
    }

    /// Sets the push topic name.
    #[must_use]
    pub fn stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }
}
