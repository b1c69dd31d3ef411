use crate::lemma::{FeatureSet, LemmaFeature, SearchFilters};
use crate::ConfigResult;
use serde::Deserialize;
use std::path::PathBuf;

/// Default site root of the Duden online dictionary
pub const DEFAULT_BASE_URL: &str = "https://www.duden.de/";

/// Main configuration structure for Duden-Crawl
///
/// Every section may be omitted from the TOML file; the search term and the
/// output path must then come from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

impl Config {
    /// Builds the validated, ordered feature set from `output.features`
    pub fn feature_set(&self) -> ConfigResult<FeatureSet> {
        FeatureSet::new(self.output.features.iter().copied())
    }
}

/// What to search for and which hits to follow
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// Search term that seeds the crawl
    #[serde(default)]
    pub term: String,

    /// Filters applied to every search hit
    #[serde(flatten)]
    pub filters: SearchFilters,
}

/// Output file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the delimited output file, must not exist yet
    #[serde(default)]
    pub path: PathBuf,

    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Features to extract, in column order
    #[serde(default = "default_features")]
    pub features: Vec<LemmaFeature>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: default_delimiter(),
            features: default_features(),
        }
    }
}

/// Fetch engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Site root; entry links are resolved against it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of fetches in flight
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,

    /// Minimum time between two dispatched requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Retries for 5xx, 429 and timeouts
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Wait before each retry (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Drop requests for URLs that were already enqueued
    #[serde(rename = "dedupe-requests", default = "default_dedupe")]
    pub dedupe_requests: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_concurrent_requests: default_max_concurrent(),
            request_delay_ms: default_request_delay(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            dedupe_requests: default_dedupe(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

fn default_features() -> Vec<LemmaFeature> {
    LemmaFeature::ALL.to_vec()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_request_delay() -> u64 {
    250
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("duden-crawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_dedupe() -> bool {
    true
}
