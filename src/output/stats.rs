//! Per-run crawl statistics
//!
//! Counters are updated by the crawl loop as requests are dispatched and
//! pages are handled, then printed once the frontier drains.

use crate::state::PageKind;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the crawl loop started
    pub started_at: DateTime<Utc>,

    /// When the crawl loop finished, if it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Search-result pages dispatched to the fetcher
    pub search_pages_requested: u64,

    /// Entry pages dispatched to the fetcher
    pub entry_pages_requested: u64,

    /// Search-result pages fetched and handled
    pub search_pages_processed: u64,

    /// Entry pages fetched and handled
    pub entry_pages_processed: u64,

    /// Outlines successfully extracted from search pages
    pub outlines_seen: u64,

    /// Outlines that passed the filters and were followed
    pub outlines_followed: u64,

    /// Data rows written to the output file
    pub records_written: u64,

    /// Requests dropped because their URL was already enqueued
    pub duplicates_skipped: u64,

    /// Requests that failed after all retries
    pub fetch_failures: u64,
}

impl CrawlStatistics {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            search_pages_requested: 0,
            entry_pages_requested: 0,
            search_pages_processed: 0,
            entry_pages_processed: 0,
            outlines_seen: 0,
            outlines_followed: 0,
            records_written: 0,
            duplicates_skipped: 0,
            fetch_failures: 0,
        }
    }

    /// Counts a request handed to the fetcher
    pub fn record_dispatch(&mut self, kind: PageKind) {
        match kind {
            PageKind::SearchResults => self.search_pages_requested += 1,
            PageKind::Entry => self.entry_pages_requested += 1,
        }
    }

    /// Counts a page that was fetched and handled
    pub fn record_processed(&mut self, kind: PageKind) {
        match kind {
            PageKind::SearchResults => self.search_pages_processed += 1,
            PageKind::Entry => self.entry_pages_processed += 1,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total requests dispatched
    pub fn total_requests(&self) -> u64 {
        self.search_pages_requested + self.entry_pages_requested
    }

    /// Wall-clock duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Share of seen outlines that were followed, as a percentage
    pub fn follow_rate(&self) -> f64 {
        if self.outlines_seen == 0 {
            return 0.0;
        }
        (self.outlines_followed as f64 / self.outlines_seen as f64) * 100.0
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {:.1}s", duration);
    }
    println!();

    println!("Requests:");
    println!(
        "  Search pages: {} requested, {} processed",
        stats.search_pages_requested, stats.search_pages_processed
    );
    println!(
        "  Entry pages: {} requested, {} processed",
        stats.entry_pages_requested, stats.entry_pages_processed
    );
    if stats.duplicates_skipped > 0 {
        println!("  Duplicates skipped: {}", stats.duplicates_skipped);
    }
    if stats.fetch_failures > 0 {
        println!("  Failed fetches: {}", stats.fetch_failures);
    }
    println!();

    println!(
        "Outlines: {} seen, {} followed ({:.1}%)",
        stats.outlines_seen,
        stats.outlines_followed,
        stats.follow_rate()
    );
    println!("Records written: {}", stats.records_written);
}
