/// Page kind definitions for dispatching fetched pages
///
/// The crawl only ever visits two kinds of pages, and the kind is decided
/// when the request is enqueued, never by inspecting the response.
use std::fmt;

/// The kind of page a pending fetch will return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// A page of search results; yields entry links and at most one next page
    SearchResults,

    /// A single dictionary entry; yields one output record and nothing to follow
    Entry,
}

impl PageKind {
    /// Returns true if no further fetches can be spawned from this kind
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entry)
    }

    /// Short name used in log lines and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchResults => "search_results",
            Self::Entry => "entry",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
