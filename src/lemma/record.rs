use crate::lemma::LemmaFeature;
use std::collections::BTreeMap;
use std::fmt;

/// One search hit as shown on a search-result page
///
/// Only lives for the duration of a single search-page pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaOutline {
    /// Headword with soft hyphens removed
    pub title: String,

    /// Leading snippet text, starts with the German part-of-speech label
    pub description_prefix: String,

    /// Link to the entry page, relative to the site root
    pub relative_url: String,
}

/// One output row: feature name to extracted value
///
/// A feature key that maps to `None` was requested but not found on the
/// page; it is written as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LemmaRecord {
    fields: BTreeMap<LemmaFeature, Option<String>>,
}

impl LemmaRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a feature, replacing any previous value
    pub fn insert(&mut self, feature: LemmaFeature, value: Option<String>) {
        self.fields.insert(feature, value);
    }

    /// Returns the value of a feature, `None` if absent or not extracted
    pub fn get(&self, feature: LemmaFeature) -> Option<&str> {
        self.fields.get(&feature).and_then(|v| v.as_deref())
    }

    /// Returns true if the feature is a key of this record
    pub fn has_feature(&self, feature: LemmaFeature) -> bool {
        self.fields.contains_key(&feature)
    }

    pub fn features(&self) -> impl Iterator<Item = LemmaFeature> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for LemmaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (feature, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{}: {:?}", feature, v)?,
                None => write!(f, "{}: None", feature)?,
            }
        }
        f.write_str("}")
    }
}

impl FromIterator<(LemmaFeature, Option<String>)> for LemmaRecord {
    fn from_iter<T: IntoIterator<Item = (LemmaFeature, Option<String>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
