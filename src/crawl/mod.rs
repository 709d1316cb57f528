// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - A hard cap on how many distinct pages get visited (MAX_LINKS)
// - Every visited page's words go into the index
// - Fetch failures are logged and skipped, never fatal
//
// Submodules:
// - frontier: the visited set + pending queue driving the crawl
// - fetch: the PageSource trait and its HTTP / cached / in-memory versions
// - html: word and link extraction from HTML
// =============================================================================

mod fetch;
mod frontier;
mod html;

pub use fetch::{fetch_words, list_links, CachedSource, HttpSource, MemorySource, Page, PageSource};
pub use frontier::{CrawlFrontier, CrawlSummary, MAX_LINKS};
pub use html::{extract_links, extract_words, normalize_url};
