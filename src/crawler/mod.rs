//! Crawler module for Duden search and entry pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML extraction of outlines, pagination and entry fields
//! - Frontier scheduling with politeness delay and duplicate suppression
//! - The page-kind state machine and crawl loop

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, search_url, Coordinator, FetchResponse, PageOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchResult, RetryPolicy};
pub use parser::{
    extract_entry_fields, extract_hyphenation, extract_next_page_url, extract_outline,
    extract_outlines, extract_part_of_speech, extract_title, ExtractError,
};
pub use scheduler::{FetchRequest, Scheduler};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Create the output file and write its header
/// 3. Fetch search-result pages, following pagination
/// 4. Fetch and extract every relevant entry page
/// 5. Return the run's statistics
pub async fn crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    run_crawl(config).await
}
