use crate::ConfigError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Parts of speech a search can be restricted to
///
/// Duden labels every search snippet with the German word type, so the
/// filter compares against `label()` rather than the English variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, ValueEnum)]
pub enum PartOfSpeech {
    #[serde(rename = "Verb", alias = "verb")]
    #[value(name = "Verb", alias = "verb")]
    Verb,

    #[serde(rename = "Adjektiv", alias = "adjective")]
    #[value(name = "Adjektiv", alias = "adjective")]
    Adjective,

    #[serde(rename = "Substantiv", alias = "noun")]
    #[value(name = "Substantiv", alias = "noun")]
    Noun,
}

impl PartOfSpeech {
    /// Returns the German label Duden uses in search snippets
    pub fn label(&self) -> &'static str {
        match self {
            Self::Verb => "Verb",
            Self::Adjective => "Adjektiv",
            Self::Noun => "Substantiv",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field that can be extracted from an entry page and written as a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LemmaFeature {
    /// The entry page's own URL
    #[value(name = "url")]
    Url,

    /// Headword with soft hyphens removed
    #[value(name = "title")]
    Title,

    /// Word type from the entry's "Wortart" tuple
    #[serde(alias = "part-of-speech")]
    #[value(name = "part_of_speech", alias = "part-of-speech")]
    PartOfSpeech,

    /// Headword with syllable breaks rendered as " | "
    #[value(name = "hyphenation")]
    Hyphenation,
}

impl LemmaFeature {
    /// All known features in default column order
    pub const ALL: [LemmaFeature; 4] = [
        Self::Url,
        Self::Title,
        Self::PartOfSpeech,
        Self::Hyphenation,
    ];

    /// Returns the column name written to the header row
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Title => "title",
            Self::PartOfSpeech => "part_of_speech",
            Self::Hyphenation => "hyphenation",
        }
    }
}

impl fmt::Display for LemmaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered set of features extracted per lemma
///
/// Membership is what the writer validates against; order only decides the
/// column layout. Duplicates are dropped keeping the first mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    features: Vec<LemmaFeature>,
}

impl FeatureSet {
    /// Builds a feature set from any sequence of features
    ///
    /// # Returns
    ///
    /// * `Ok(FeatureSet)` - At least one feature was given
    /// * `Err(ConfigError::Validation)` - The sequence was empty
    pub fn new<I>(features: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = LemmaFeature>,
    {
        let mut ordered = Vec::new();
        for feature in features {
            if !ordered.contains(&feature) {
                ordered.push(feature);
            }
        }

        if ordered.is_empty() {
            return Err(ConfigError::Validation(
                "at least one feature must be extracted".to_string(),
            ));
        }

        Ok(Self { features: ordered })
    }

    /// Feature set with every known feature in default order
    pub fn all() -> Self {
        Self {
            features: LemmaFeature::ALL.to_vec(),
        }
    }

    pub fn contains(&self, feature: LemmaFeature) -> bool {
        self.features.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = LemmaFeature> + '_ {
        self.features.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Column names in output order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.features.iter().map(LemmaFeature::as_str).collect()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::all()
    }
}
