use crate::config::types::{Config, CrawlerConfig, OutputConfig, SearchConfig};
use crate::lemma::FeatureSet;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates the search term and filters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.term.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search term cannot be empty".to_string(),
        ));
    }

    if let Some(pos) = &config.filters.part_of_speech {
        if pos.is_empty() {
            return Err(ConfigError::Validation(
                "part-of-speech filter must name at least one value".to_string(),
            ));
        }
    }

    if let Some(prefixes) = &config.filters.does_not_start_with {
        // An empty prefix would reject every title
        if prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Validation(
                "does-not-start-with cannot contain an empty prefix".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    validate_delimiter(config.delimiter)?;

    FeatureSet::new(config.features.iter().copied())?;

    Ok(())
}

/// Validates the field delimiter
///
/// The delimited writer works on bytes, so only single-byte delimiters are
/// usable. Quotes and line breaks would make rows ambiguous.
fn validate_delimiter(delimiter: char) -> Result<(), ConfigError> {
    if !delimiter.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "delimiter must be an ASCII character, got '{}'",
            delimiter
        )));
    }

    if matches!(delimiter, '"' | '\r' | '\n') {
        return Err(ConfigError::Validation(format!(
            "delimiter cannot be {:?}",
            delimiter
        )));
    }

    Ok(())
}

/// Validates fetch engine configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if base.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
