// src/crawl/frontier.rs
// =============================================================================
// Breadth-first discovery of up to `max_links` pages starting from a seed URL.
// Every page we visit has its words added to the index.
//
// How it works:
// 1. Start with the seed URL (normalized like a link would be) in the queue
// 2. Pop the front URL and mark it visited (this is when it "counts")
// 3. If visited + pending is still below the cap, append ALL links of the page
//    to the queue (no filtering: duplicates and already-visited URLs go in too)
// 4. Fetch the page again for its words and add them to the index
// 5. Repeat until the cap is reached or the queue is empty
//
// A URL that was already visited is dropped when it reaches the front of the
// queue. A URL that fails to fetch stays visited and is never retried.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// =============================================================================

use super::fetch::{fetch_words, list_links, PageSource};
use super::html::normalize_url;
use crate::error::FetchError;
use crate::index::Index;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Default number of distinct pages a crawl may visit
pub const MAX_LINKS: usize = 50;

/// What a finished crawl did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Every visited URL, in the order it was visited
    pub visited: Vec<String>,
    /// How many link listings or word fetches failed
    pub failures: usize,
    /// The URLs those failures belong to
    pub failed: BTreeSet<String>,
    /// How many (word, position, url) entries were sent to the index
    pub words_indexed: usize,
}

/// The visited set and pending queue for one crawl.
#[derive(Debug)]
pub struct CrawlFrontier {
    max_links: usize,
    visited: HashSet<String>,
    pending: VecDeque<String>,
}

impl Default for CrawlFrontier {
    fn default() -> Self {
        Self::new(MAX_LINKS)
    }
}

impl CrawlFrontier {
    /// A frontier that visits at most `max_links` pages (at least one)
    pub fn new(max_links: usize) -> Self {
        Self {
            max_links: max_links.max(1),
            visited: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn max_links(&self) -> usize {
        self.max_links
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn pending(&self) -> &VecDeque<String> {
        &self.pending
    }

    /// Crawls outward from `seed`, feeding every visited page to `index`.
    ///
    /// Parameters:
    ///   seed: the starting URL; "https://a.com" and "https://a.com/" are the
    ///     same page, a seed that doesn't parse is kept as typed
    ///   source: where pages come from (HTTP, cache, memory)
    ///   index: receives each page's words under the visited URL
    ///
    /// Returns: CrawlSummary with the visit order and any failures.
    ///   Individual fetch failures are logged and skipped; they never stop the
    ///   crawl.
    pub async fn crawl<S, I>(&mut self, seed: &str, source: &S, index: &I) -> CrawlSummary
    where
        S: PageSource,
        I: Index + ?Sized,
    {
        let mut summary = CrawlSummary::default();
        let seed = normalize_url(seed).unwrap_or_else(|| seed.to_string());
        self.pending.push_back(seed);

        while self.visited.len() < self.max_links {
            let Some(current) = self.pending.pop_front() else {
                break;
            };

            if !self.visited.insert(current.clone()) {
                log::debug!("already visited {}, dropping", current);
                continue;
            }
            log::debug!("visiting [{}/{}] {}", self.visited.len(), self.max_links, current);
            summary.visited.push(current.clone());

            // The cap is checked once per page, not per discovered link
            if self.visited.len() + self.pending.len() < self.max_links {
                match list_links(source, &current).await {
                    Ok(links) => self.pending.extend(links),
                    Err(e) => {
                        log::warn!("could not list links: {}", e);
                        summary.record_failure(&e);
                    }
                }
            }

            match fetch_words(source, &current).await {
                Ok(words) => summary.words_indexed += index.add_page(&words, &current),
                Err(e) => {
                    log::warn!("could not fetch words: {}", e);
                    summary.record_failure(&e);
                }
            }
        }

        log::info!(
            "crawl finished: {} visited, {} still pending, {} failure(s)",
            self.visited.len(),
            self.pending.len(),
            summary.failures
        );
        summary
    }
}

impl CrawlSummary {
    fn record_failure(&mut self, error: &FetchError) {
        self.failures += 1;
        self.failed.insert(error.url().to_string());
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the cap checked against visited + pending?
//    - pending already holds URLs we will probably visit, so once the two add
//      up to the cap there is no point listing more links
//    - The check happens once per page, so one page may push pending past the
//      cap; visited itself never goes past it
//
// 2. Why drop visited URLs at the front of the queue and not when adding?
//    - Links go in unfiltered, which keeps listing cheap and the order simple
//    - The HashSet lookup at dequeue time is all that keeps a page from being
//      indexed twice
//
// 3. Why is the seed normalized?
//    - Links come out of Url::join in canonical form ("https://a.com/"), so a
//      seed typed as "https://a.com" would otherwise be visited twice
// -----------------------------------------------------------------------------
