use crate::lemma::{LemmaOutline, PartOfSpeech};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Optional constraints on which search hits get followed
///
/// Every field is optional; an absent field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchFilters {
    /// Accept only outlines whose snippet starts with one of these labels
    #[serde(default)]
    pub part_of_speech: Option<BTreeSet<PartOfSpeech>>,

    /// Accept only titles starting with this exact prefix
    #[serde(default)]
    pub starts_with: Option<String>,

    /// Reject titles starting with any of these prefixes
    #[serde(default)]
    pub does_not_start_with: Option<Vec<String>>,
}

impl SearchFilters {
    /// Returns true if no constraint is set
    pub fn is_unconstrained(&self) -> bool {
        self.part_of_speech.is_none()
            && self.starts_with.is_none()
            && self.does_not_start_with.is_none()
    }
}

/// Decides whether a search hit should be followed
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. `starts_with` against the title (case-sensitive prefix)
/// 2. `does_not_start_with` against the title
/// 3. `part_of_speech` against the description prefix, using the German labels
pub fn is_relevant(outline: &LemmaOutline, filters: &SearchFilters) -> bool {
    if let Some(prefix) = &filters.starts_with {
        if !outline.title.starts_with(prefix.as_str()) {
            return false;
        }
    }

    if let Some(forbidden) = &filters.does_not_start_with {
        if forbidden
            .iter()
            .any(|prefix| outline.title.starts_with(prefix.as_str()))
        {
            return false;
        }
    }

    if let Some(wanted) = &filters.part_of_speech {
        if !wanted
            .iter()
            .any(|pos| outline.description_prefix.starts_with(pos.label()))
        {
            return false;
        }
    }

    true
}
