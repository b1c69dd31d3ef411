//! HTML extraction for Duden search-result and entry pages
//!
//! This module pulls structured data out of parsed pages:
//! - Lemma outlines and the next-page link from search-result pages
//! - Title, hyphenation and part of speech from entry pages
//!
//! Everything here is pure: functions only read the document they are given.
//! A missing element is reported per outline or per feature, never for the
//! whole page.

use crate::lemma::{
    render_hyphenation, strip_soft_hyphens, FeatureSet, LemmaFeature, LemmaOutline, LemmaRecord,
};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const OUTLINE: &str = "section.vignette";
const OUTLINE_TITLE: &str = "h2.vignette__title > a > strong";
const OUTLINE_SNIPPET: &str = "p.vignette__snippet";
const OUTLINE_LINK: &str = "a.vignette__link";
const NEXT_PAGE_LINK: &str = r#"a.pager__item[rel="next"][href]"#;
const ENTRY_HEADLINE: &str = "div.lemma > h1 > span";
const ENTRY_TUPLE: &str = "article > dl";
const TUPLE_KEY: &str = "dt.tuple__key";
const TUPLE_VALUE: &str = "dd.tuple__val";

/// Label of the definition-list tuple holding the word type
const PART_OF_SPEECH_LABEL: &str = "Wortart";

/// Errors raised while extracting a single value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("invalid selector: {0}")]
    Selector(String),
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{}: {:?}", css, e)))
}

/// Returns the first text node that is a direct child of `element`
fn first_own_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .find_map(|child| child.value().as_text().map(|text| text.to_string()))
}

/// Extracts every lemma outline from a search-result page
///
/// Outlines missing their title, snippet or link are skipped with a warning;
/// the remaining outlines on the page are still returned.
///
/// # Example
///
/// ```
/// use duden_crawl::crawler::extract_outlines;
/// use scraper::Html;
///
/// let html = r#"<section class="vignette">
///   <h2 class="vignette__title"><a><strong>Ap&shy;fel</strong></a></h2>
///   <p class="vignette__snippet"> Substantiv, maskulin </p>
///   <a class="vignette__link" href="/rechtschreibung/Apfel">mehr</a>
/// </section>"#;
/// let outlines = extract_outlines(&Html::parse_document(html));
/// assert_eq!(outlines[0].title, "Apfel");
/// assert_eq!(outlines[0].description_prefix, "Substantiv, maskulin");
/// ```
pub fn extract_outlines(search_page: &Html) -> Vec<LemmaOutline> {
    let outline_selector = match selector(OUTLINE) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Cannot select outlines: {}", e);
            return Vec::new();
        }
    };

    let mut outlines = Vec::new();
    for (index, element) in search_page.select(&outline_selector).enumerate() {
        match extract_outline(element) {
            Ok(outline) => outlines.push(outline),
            Err(e) => tracing::warn!("Skipping search hit #{}: {}", index + 1, e),
        }
    }

    outlines
}

/// Extracts one outline from its `section.vignette` element
pub fn extract_outline(outline: ElementRef<'_>) -> Result<LemmaOutline, ExtractError> {
    let title = outline
        .select(&selector(OUTLINE_TITLE)?)
        .next()
        .and_then(first_own_text)
        .ok_or(ExtractError::MissingElement("outline title"))?;

    let description = outline
        .select(&selector(OUTLINE_SNIPPET)?)
        .next()
        .and_then(first_own_text)
        .ok_or(ExtractError::MissingElement("outline snippet"))?;

    let relative_url = outline
        .select(&selector(OUTLINE_LINK)?)
        .find_map(|link| link.value().attr("href"))
        .ok_or(ExtractError::MissingElement("outline link"))?;

    Ok(LemmaOutline {
        title: strip_soft_hyphens(&title),
        description_prefix: description.trim().to_string(),
        relative_url: relative_url.to_string(),
    })
}

/// Returns the raw `href` of the "next" pagination link, if any
///
/// `None` ends the pagination lineage.
pub fn extract_next_page_url(search_page: &Html) -> Option<String> {
    let next_selector = selector(NEXT_PAGE_LINK).ok()?;

    search_page
        .select(&next_selector)
        .find_map(|link| link.value().attr("href"))
        .map(str::to_string)
}

/// Extracts the requested features from an entry page
///
/// Every requested feature becomes a key of the record. A feature whose
/// element is missing maps to `None` without affecting the others.
///
/// # Arguments
///
/// * `entry_page` - The parsed entry page
/// * `page_url` - The URL the page was requested from
/// * `features` - Features to extract
pub fn extract_entry_fields(entry_page: &Html, page_url: &str, features: &FeatureSet) -> LemmaRecord {
    let mut record = LemmaRecord::new();

    for feature in features.iter() {
        let value = match feature {
            LemmaFeature::Url => Ok(page_url.to_string()),
            LemmaFeature::Title => extract_title(entry_page),
            LemmaFeature::Hyphenation => extract_hyphenation(entry_page),
            LemmaFeature::PartOfSpeech => extract_part_of_speech(entry_page),
        };

        let value = match value {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("No {} on {}: {}", feature, page_url, e);
                None
            }
        };

        record.insert(feature, value);
    }

    record
}

/// Returns the entry headline exactly as written, soft hyphens included
fn extract_raw_title(entry_page: &Html) -> Result<String, ExtractError> {
    entry_page
        .select(&selector(ENTRY_HEADLINE)?)
        .next()
        .and_then(first_own_text)
        .ok_or(ExtractError::MissingElement("entry headline"))
}

/// Entry headline with soft hyphens removed
pub fn extract_title(entry_page: &Html) -> Result<String, ExtractError> {
    extract_raw_title(entry_page).map(|raw| strip_soft_hyphens(&raw))
}

/// Entry headline with soft hyphens rendered as `" | "`
pub fn extract_hyphenation(entry_page: &Html) -> Result<String, ExtractError> {
    extract_raw_title(entry_page).map(|raw| render_hyphenation(&raw))
}

/// Value of the definition-list tuple labelled "Wortart"
pub fn extract_part_of_speech(entry_page: &Html) -> Result<String, ExtractError> {
    let tuple_selector = selector(ENTRY_TUPLE)?;
    let key_selector = selector(TUPLE_KEY)?;
    let value_selector = selector(TUPLE_VALUE)?;

    for tuple in entry_page.select(&tuple_selector) {
        let labelled = tuple.select(&key_selector).any(|key| {
            first_own_text(key).is_some_and(|label| label.contains(PART_OF_SPEECH_LABEL))
        });
        if !labelled {
            continue;
        }

        if let Some(value) = tuple.select(&value_selector).find_map(first_own_text) {
            return Ok(value.trim().to_string());
        }
    }

    Err(ExtractError::MissingElement("part-of-speech tuple"))
}
