//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the state machine that turns fetched pages into
//! follow-up requests and output rows, and the loop that drives it:
//! - Seeding the frontier with the search URL
//! - Dispatching fetches with bounded concurrency
//! - Handing each response to the parse path of its page kind
//! - Writing one record per entry page

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, RetryPolicy};
use crate::crawler::parser::{extract_entry_fields, extract_next_page_url, extract_outlines};
use crate::crawler::scheduler::{FetchRequest, Scheduler};
use crate::lemma::{is_relevant, FeatureSet, LemmaRecord};
use crate::output::{CrawlStatistics, OutputError, RecordWriter};
use crate::state::PageKind;
use crate::CrawlError;
use scraper::Html;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// A fetched page handed back by the fetch engine
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The request this response answers
    pub request: FetchRequest,

    /// URL after redirects
    pub final_url: Url,

    /// Raw HTML body
    pub body: String,
}

/// What handling one page produced
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// A search-result page was handled
    SearchResults {
        /// Outlines extracted from the page
        outlines_seen: usize,
        /// Entry pages to fetch, one per relevant outline
        entries: Vec<FetchRequest>,
        /// The next search-result page, if the page links one
        next_page: Option<FetchRequest>,
    },

    /// An entry page was handled and its record written
    Entry { record: LemmaRecord },
}

impl PageOutcome {
    /// Consumes the outcome, returning the fetches it spawned
    pub fn into_follow_ups(self) -> Vec<FetchRequest> {
        match self {
            Self::SearchResults {
                mut entries,
                next_page,
                ..
            } => {
                entries.extend(next_page);
                entries
            }
            Self::Entry { .. } => Vec::new(),
        }
    }
}

/// Builds the search URL that seeds the crawl
///
/// The term is percent-encoded as a single path segment below
/// `suchen/dudenonline/`.
///
/// # Example
///
/// ```
/// use duden_crawl::crawler::search_url;
/// use url::Url;
///
/// let base = Url::parse("https://www.duden.de/").unwrap();
/// let url = search_url(&base, "Apfel").unwrap();
/// assert_eq!(url.as_str(), "https://www.duden.de/suchen/dudenonline/Apfel");
/// ```
pub fn search_url(base_url: &Url, term: &str) -> Result<Url, CrawlError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| CrawlError::InvalidSeed {
            base: base_url.to_string(),
            message: "URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(["suchen", "dudenonline", term.trim()]);
    Ok(url)
}

/// Main crawler coordinator structure
///
/// Holds the immutable configuration and the single output writer. All
/// page handling goes through `handle_response`, which takes `&self` and
/// serializes writes through a mutex.
pub struct Coordinator {
    config: Arc<Config>,
    base_url: Url,
    features: FeatureSet,
    writer: Mutex<RecordWriter>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration and creates the output file, so a stale
    /// output file or a bad setting fails the run before any request is made.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl, header already written
    /// * `Err(CrawlError)` - Invalid configuration or output setup failure
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;

        let base_url = Url::parse(&config.crawler.base_url)?;
        let features = config.feature_set()?;
        let writer = RecordWriter::create(
            &config.output.path,
            features.clone(),
            config.output.delimiter,
        )?;

        tracing::info!(
            "Writing {:?} to {}",
            features.column_names(),
            config.output.path.display()
        );

        Ok(Self {
            config: Arc::new(config),
            base_url,
            features,
            writer: Mutex::new(writer),
        })
    }

    /// The validated configuration this coordinator was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The request for the first search-result page
    pub fn seed_request(&self) -> Result<FetchRequest, CrawlError> {
        search_url(&self.base_url, &self.config.search.term).map(FetchRequest::search_results)
    }

    /// Handles one fetched page according to its page kind
    ///
    /// Extraction gaps are logged and skipped. Only output failures are
    /// returned as errors; they mean the crawl cannot continue.
    pub fn handle_response(&self, response: &FetchResponse) -> Result<PageOutcome, CrawlError> {
        match response.request.kind {
            PageKind::SearchResults => Ok(self.handle_search_page(response)),
            PageKind::Entry => self.handle_entry_page(response),
        }
    }

    fn handle_search_page(&self, response: &FetchResponse) -> PageOutcome {
        let document = Html::parse_document(&response.body);
        let outlines = extract_outlines(&document);
        let filters = &self.config.search.filters;

        let mut entries = Vec::new();
        for outline in &outlines {
            if !is_relevant(outline, filters) {
                tracing::debug!("Filtered out {}", outline.title);
                continue;
            }

            // Entry links are site-relative
            match self.base_url.join(&outline.relative_url) {
                Ok(url) => entries.push(FetchRequest::entry(url)),
                Err(e) => tracing::warn!(
                    "Cannot resolve link {} for {}: {}",
                    outline.relative_url,
                    outline.title,
                    e
                ),
            }
        }

        // Pagination links are relative to the page as served, after redirects
        let next_page = extract_next_page_url(&document).and_then(|href| {
            match response.final_url.join(&href) {
                Ok(url) => Some(FetchRequest::search_results(url)),
                Err(e) => {
                    tracing::warn!("Cannot resolve next-page link {}: {}", href, e);
                    None
                }
            }
        });

        tracing::debug!(
            "Search page {}: {} outlines, {} followed, next page: {}",
            response.final_url,
            outlines.len(),
            entries.len(),
            next_page
                .as_ref()
                .map(|r| r.url.as_str())
                .unwrap_or("none")
        );

        PageOutcome::SearchResults {
            outlines_seen: outlines.len(),
            entries,
            next_page,
        }
    }

    fn handle_entry_page(&self, response: &FetchResponse) -> Result<PageOutcome, CrawlError> {
        let document = Html::parse_document(&response.body);
        let record = extract_entry_fields(&document, response.final_url.as_str(), &self.features);

        {
            let mut writer = self.writer.lock().map_err(|_| OutputError::Poisoned)?;
            writer.write_row(&record)?;
        }

        tracing::debug!("Wrote record for {}", response.final_url);
        Ok(PageOutcome::Entry { record })
    }

    /// Number of data rows written so far
    pub fn records_written(&self) -> u64 {
        self.writer
            .lock()
            .map(|writer| writer.rows_written())
            .unwrap_or(0)
    }

    /// Runs the crawl until the frontier drains
    ///
    /// This method:
    /// 1. Seeds the frontier with the search URL
    /// 2. Keeps up to `max-concurrent-requests` fetches in flight
    /// 3. Hands each completed page to `handle_response`
    /// 4. Enqueues the follow-up requests it returns
    ///
    /// Failed fetches are logged and dropped. An output error aborts the
    /// crawl; in-flight fetches are cancelled.
    pub async fn run(&self) -> Result<CrawlStatistics, CrawlError> {
        let crawler_config = &self.config.crawler;
        let client = build_http_client(crawler_config)?;
        let policy = RetryPolicy::from_config(crawler_config);
        let max_in_flight = crawler_config.max_concurrent_requests as usize;

        let mut scheduler = Scheduler::new(crawler_config);
        let mut stats = CrawlStatistics::new();
        let mut in_flight: JoinSet<(FetchRequest, FetchResult)> = JoinSet::new();
        let mut completed: u64 = 0;

        let seed = self.seed_request()?;
        tracing::info!("Starting crawl at {}", seed.url);
        scheduler.enqueue(seed);

        loop {
            while in_flight.len() < max_in_flight {
                let Some(request) = scheduler.pop_ready(Instant::now()) else {
                    break;
                };

                tracing::debug!("Fetching {} page: {}", request.kind, request.url);
                stats.record_dispatch(request.kind);

                let client = client.clone();
                in_flight.spawn(async move {
                    let result = fetch_url(&client, request.url.as_str(), &policy).await;
                    (request, result)
                });
            }

            if in_flight.is_empty() && scheduler.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            // Keep handling responses while the next dispatch slot is closed
            let joined = if in_flight.len() < max_in_flight && !scheduler.is_empty() {
                let wait = scheduler.dispatch_delay(Instant::now());
                tokio::select! {
                    Some(joined) = in_flight.join_next() => joined,
                    _ = tokio::time::sleep(wait) => continue,
                }
            } else {
                match in_flight.join_next().await {
                    Some(joined) => joined,
                    None => continue,
                }
            };

            completed += 1;
            let (request, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            match result {
                FetchResult::Success {
                    final_url, body, ..
                } => {
                    let final_url = Url::parse(&final_url).unwrap_or_else(|_| request.url.clone());
                    if final_url != request.url {
                        tracing::debug!("{} redirected to {}", request.url, final_url);
                    }

                    let kind = request.kind;
                    let response = FetchResponse {
                        request,
                        final_url,
                        body,
                    };

                    let outcome = self.handle_response(&response)?;
                    stats.record_processed(kind);

                    match &outcome {
                        PageOutcome::SearchResults {
                            outlines_seen,
                            entries,
                            ..
                        } => {
                            stats.outlines_seen += *outlines_seen as u64;
                            stats.outlines_followed += entries.len() as u64;
                        }
                        PageOutcome::Entry { .. } => stats.records_written += 1,
                    }

                    let follow_ups = outcome.into_follow_ups();
                    debug_assert!(
                        !kind.is_terminal() || follow_ups.is_empty(),
                        "{} page spawned follow-ups",
                        kind
                    );

                    for follow_up in follow_ups {
                        if !scheduler.enqueue(follow_up) {
                            stats.duplicates_skipped += 1;
                        }
                    }
                }

                FetchResult::HttpError { status_code } => {
                    tracing::warn!(
                        "HTTP {} for {} page {}, skipping",
                        status_code,
                        request.kind,
                        request.url
                    );
                    stats.fetch_failures += 1;
                }

                FetchResult::NetworkError { error } => {
                    tracing::warn!(
                        "Failed to fetch {} page {}: {}",
                        request.kind,
                        request.url,
                        error
                    );
                    stats.fetch_failures += 1;
                }
            }

            if completed % 50 == 0 {
                tracing::info!(
                    "Progress: {} requests, {} records, {} in frontier",
                    stats.total_requests(),
                    stats.records_written,
                    scheduler.frontier_size()
                );
            }
        }

        stats.finish();
        tracing::info!(
            "Crawl completed: {} records written from {} search pages in {:.1}s",
            stats.records_written,
            stats.search_pages_processed,
            stats.duration_seconds().unwrap_or_default()
        );

        Ok(stats)
    }
}

/// Runs a complete crawl from a validated configuration
///
/// # Example
///
/// ```no_run
/// use duden_crawl::config::load_config;
/// use duden_crawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("duden.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} lemmas written", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, CrawlError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
