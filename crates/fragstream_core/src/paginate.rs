//! Pagination metadata: the backward link chain over fragments.

use crate::index::FragmentRef;
use crate::timestamp::format_ts;

/// Pagination links for one fragment position.
///
/// Only the backward direction is produced: following `previous` from
/// any fragment walks history down to the earliest one, which has no
/// link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    /// Link to the fragment immediately preceding this one, if any.
    pub previous: Option<String>,
}

impl PageLinks {
    /// Renders the links as response-body metadata.
    ///
    /// The exact textual shape is a formatting detail; the contract is
    /// one backward link, or nothing at index 0.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.previous {
            Some(uri) => format!("previous <{uri}>\n"),
            None => String::new(),
        }
    }
}

/// Computes the links for the fragment at `index` in the sorted boundary
/// sequence.
///
/// `index` may equal `boundaries.len()`: that is the implicit "current"
/// pseudo-fragment served by the live view, whose previous fragment is
/// the newest one on disk.
#[must_use]
pub fn page_links(base_uri: &str, boundaries: &[FragmentRef], index: usize) -> PageLinks {
    let previous = index
        .checked_sub(1)
        .and_then(|i| boundaries.get(i))
        .map(|r| format!("{}?time={}", base_uri, format_ts(r.timestamp)));
    PageLinks { previous }
}
