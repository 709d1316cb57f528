// src/lib.rs
// =============================================================================
// page-searcher: crawl a bounded set of pages into an inverted index, then run
// a file of queries against it on a thread pool.
//
// Modules:
// - crawl: breadth-first crawl frontier and page fetching
// - index: the inverted index and search results
// - search: query normalization and the parallel query executor
// - pool: the worker thread pool
// - words: text cleaning shared by both sides
// - error: error types
// =============================================================================

pub mod crawl;
pub mod error;
pub mod index;
pub mod pool;
pub mod search;
pub mod words;

pub use error::{FetchError, SearchError};
