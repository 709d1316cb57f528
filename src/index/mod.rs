// src/index/mod.rs
// =============================================================================
// The word index that the crawler fills and the searcher queries.
//
// Submodules:
// - inverted: the plain (single-threaded) inverted index
// - concurrent: the same index behind a RwLock, shared across threads
// - result: SearchResult and its ranking order
//
// The `Index` trait is the only thing the crawl and search modules depend on,
// so tests can plug in their own implementation.
// =============================================================================

mod concurrent;
mod inverted;
mod result;

pub use concurrent::ConcurrentIndex;
pub use inverted::InvertedIndex;
pub use result::SearchResult;

/// What the crawler and the query executor need from an index.
pub trait Index: Send + Sync {
    /// Records `word` at 1-based `position` inside `source`
    fn add(&self, word: &str, position: usize, source: &str);

    /// Adds one page of words with 1-based running positions and returns how
    /// many were added. Empty words are skipped but keep their position.
    fn add_page(&self, words: &[String], source: &str) -> usize {
        let mut added = 0;
        for (offset, word) in words.iter().enumerate() {
            if !word.is_empty() {
                self.add(word, offset + 1, source);
                added += 1;
            }
        }
        added
    }

    /// Sources containing any of `words` exactly
    fn exact_search(&self, words: &[String]) -> Vec<SearchResult>;

    /// Sources containing a word starting with any of `words`
    fn partial_search(&self, words: &[String]) -> Vec<SearchResult>;

    /// Dispatches on the exactness mode
    fn search(&self, words: &[String], exact: bool) -> Vec<SearchResult> {
        if exact {
            self.exact_search(words)
        } else {
            self.partial_search(words)
        }
    }
}
