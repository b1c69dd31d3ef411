//! Scheduler for managing the crawl frontier and politeness delay
//!
//! This module handles:
//! - FIFO queue of pending fetch requests, each tagged with its page kind
//! - Request-level duplicate suppression by URL
//! - A minimum delay between two dispatched requests

use crate::config::CrawlerConfig;
use crate::state::PageKind;
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use url::Url;

/// A page fetch waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// The URL to fetch
    pub url: Url,

    /// Which parse path handles the response
    pub kind: PageKind,
}

impl FetchRequest {
    pub fn search_results(url: Url) -> Self {
        Self {
            url,
            kind: PageKind::SearchResults,
        }
    }

    pub fn entry(url: Url) -> Self {
        Self {
            url,
            kind: PageKind::Entry,
        }
    }
}

/// Scheduler manages the frontier queue and request pacing
///
/// The crawl controller never deduplicates; when `dedupe` is on, the
/// scheduler drops any request whose URL was enqueued before, the way a
/// crawling engine's duplicate filter would.
pub struct Scheduler {
    /// Pending requests in enqueue order
    frontier: VecDeque<FetchRequest>,

    /// Every URL ever accepted into the frontier
    seen: HashSet<Url>,

    /// Whether repeated URLs are dropped
    dedupe: bool,

    /// Minimum time between two dispatches
    min_delay: Duration,

    /// When the last request left the frontier
    last_dispatch: Option<Instant>,
}

impl Scheduler {
    /// Creates a new, empty scheduler
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            dedupe: config.dedupe_requests,
            min_delay: Duration::from_millis(config.request_delay_ms),
            last_dispatch: None,
        }
    }

    /// Adds a request to the back of the frontier
    ///
    /// # Returns
    ///
    /// * `true` - The request was enqueued
    /// * `false` - Its URL was seen before and duplicates are suppressed
    pub fn enqueue(&mut self, request: FetchRequest) -> bool {
        let first_sighting = self.seen.insert(request.url.clone());

        if self.dedupe && !first_sighting {
            tracing::debug!("Skipping duplicate {} request: {}", request.kind, request.url);
            return false;
        }

        tracing::trace!("Enqueued {} request: {}", request.kind, request.url);
        self.frontier.push_back(request);
        true
    }

    /// Takes the next request if the politeness delay has elapsed
    ///
    /// Returns `None` when the frontier is empty or the next dispatch slot
    /// has not opened yet; `dispatch_delay` tells how long to wait.
    pub fn pop_ready(&mut self, now: Instant) -> Option<FetchRequest> {
        if !self.dispatch_delay(now).is_zero() {
            return None;
        }

        let request = self.frontier.pop_front()?;
        self.last_dispatch = Some(now);
        Some(request)
    }

    /// Time left until the next request may be dispatched
    pub fn dispatch_delay(&self, now: Instant) -> Duration {
        match self.last_dispatch {
            Some(last) => (last + self.min_delay).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Returns the number of requests in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
