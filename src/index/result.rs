// src/index/result.rs
// =============================================================================
// One search hit: how often the query matched inside one source (a URL), and
// where the first match was.
//
// Results are ranked by:
// 1. count, highest first
// 2. index (first position), lowest first
// 3. source, case-insensitive alphabetical
// =============================================================================

use serde::Serialize;
use std::cmp::Ordering;

/// A single search result for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// The source (URL) that matched
    #[serde(rename = "where")]
    pub source: String,
    /// Total number of matching word occurrences in the source
    pub count: usize,
    /// 1-based position of the first matching word
    pub index: usize,
}

impl SearchResult {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            count: 0,
            index: usize::MAX,
        }
    }

    /// Folds the positions of one matching word into this result
    pub fn record<'a>(&mut self, positions: impl IntoIterator<Item = &'a usize>) {
        for &position in positions {
            self.count += 1;
            self.index = self.index.min(position);
        }
    }
}

impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.index.cmp(&other.index))
            .then_with(|| {
                self.source
                    .to_lowercase()
                    .cmp(&other.source.to_lowercase())
            })
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
