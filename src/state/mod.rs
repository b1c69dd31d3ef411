//! State module for tracking crawl progress
//!
//! Every pending fetch carries a `PageKind` so its response is dispatched to
//! the right parse path.

mod page_kind;

pub use page_kind::PageKind;
