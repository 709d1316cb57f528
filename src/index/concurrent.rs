// src/index/concurrent.rs
// =============================================================================
// The inverted index wrapped in a read-write lock so it can be shared between
// threads: many searches may read at once, an add takes the lock exclusively.
//
// The usual pattern is still "crawl fully, then query"; the lock just makes it
// safe to do otherwise.
//
// A whole page is built into a private InvertedIndex first and merged under
// one write lock, so readers never see half a page.
// =============================================================================

use super::inverted::InvertedIndex;
use super::result::SearchResult;
use super::Index;
use parking_lot::RwLock;
use std::io::Write;

#[derive(Debug, Default)]
pub struct ConcurrentIndex {
    inner: RwLock<InvertedIndex>,
}

impl ConcurrentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str, source: &str) -> bool {
        self.inner.read().contains(word, source)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn to_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        self.inner.read().to_json(writer)
    }
}

impl Index for ConcurrentIndex {
    fn add(&self, word: &str, position: usize, source: &str) {
        self.inner.write().add(word, position, source);
    }

    fn add_page(&self, words: &[String], source: &str) -> usize {
        let mut page = InvertedIndex::new();
        let added = page.add_all(words, source);
        self.inner.write().merge(page);
        added
    }

    fn exact_search(&self, words: &[String]) -> Vec<SearchResult> {
        self.inner.read().exact_search(words)
    }

    fn partial_search(&self, words: &[String]) -> Vec<SearchResult> {
        self.inner.read().partial_search(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_adds_are_all_kept() {
        let index = Arc::new(ConcurrentIndex::new());

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    let source = format!("https://site{}.com/", n);
                    for position in 1..=50 {
                        index.add("shared", position, &source);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let hits = index.exact_search(&["shared".to_string()]);
        assert_eq!(hits.len(), 8);
        assert!(hits.iter().all(|hit| hit.count == 50 && hit.index == 1));
    }

    #[test]
    fn test_search_selects_mode() {
        let index = ConcurrentIndex::new();
        index.add_page(&["categories".to_string()], "src");
        let query = vec!["cat".to_string()];

        assert!(index.search(&query, true).is_empty());
        assert_eq!(index.search(&query, false).len(), 1);
    }

    #[test]
    fn test_add_page_merges_with_existing_entries() {
        let index = ConcurrentIndex::new();
        index.add("word", 9, "src");
        let page: Vec<String> = ["word", "", "other"].iter().map(|w| w.to_string()).collect();

        assert_eq!(index.add_page(&page, "src"), 2);
        assert_eq!(index.len(), 2);
        let hits = index.exact_search(&["word".to_string()]);
        assert_eq!(hits[0].count, 2);
        assert_eq!(hits[0].index, 1);
        assert!(index.contains("other", "src"));
    }

    #[test]
    fn test_pages_added_from_many_threads_are_all_kept() {
        let index = Arc::new(ConcurrentIndex::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    let page = vec!["shared".to_string(), format!("only{}", n)];
                    index.add_page(&page, &format!("https://site{}.com/", n))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }

        assert_eq!(index.exact_search(&["shared".to_string()]).len(), 4);
        assert_eq!(index.len(), 5);
    }
}
