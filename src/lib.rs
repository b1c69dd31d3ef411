//! Duden-Crawl: a lemma harvester for duden.de
//!
//! This crate walks the paginated search results of the Duden online
//! dictionary, follows the entries that pass the configured filters, extracts
//! lexical attributes from each entry page and appends them to a delimited
//! output file.

pub mod config;
pub mod crawler;
pub mod lemma;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Duden-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Cannot build search URL from base {base}: {message}")]
    InvalidSeed { base: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Duden-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use lemma::{FeatureSet, LemmaFeature, LemmaOutline, LemmaRecord, PartOfSpeech, SearchFilters};
pub use output::{CrawlStatistics, RecordWriter};
pub use state::PageKind;
