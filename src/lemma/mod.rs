//! Lemma data model
//!
//! This module holds the domain types shared by the parser, the relevance
//! filter and the record writer:
//! - `PartOfSpeech` and `LemmaFeature`: the closed vocabularies users choose from
//! - `FeatureSet`: the ordered, de-duplicated columns of the output file
//! - `SearchFilters` and `is_relevant`: per-outline follow/skip decision
//! - `LemmaOutline` and `LemmaRecord`: transient extraction results

mod feature;
mod filter;
mod record;

pub use feature::{FeatureSet, LemmaFeature, PartOfSpeech};
pub use filter::{is_relevant, SearchFilters};
pub use record::{LemmaOutline, LemmaRecord};

/// Unicode soft hyphen (U+00AD), marks optional syllable breaks in titles
pub const SOFT_HYPHEN: char = '\u{ad}';

/// Separator substituted for soft hyphens when rendering hyphenation
pub const HYPHENATION_SEPARATOR: &str = " | ";

/// Removes every soft hyphen from `s`
///
/// Stripping is idempotent: a string without soft hyphens comes back unchanged.
pub fn strip_soft_hyphens(s: &str) -> String {
    s.replace(SOFT_HYPHEN, "")
}

/// Replaces every soft hyphen in `s` with `" | "` to show syllable breaks
pub fn render_hyphenation(s: &str) -> String {
    s.replace(SOFT_HYPHEN, HYPHENATION_SEPARATOR)
}
