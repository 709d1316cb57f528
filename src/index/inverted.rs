// src/index/inverted.rs
// =============================================================================
// The inverted index: for every word, which sources contain it and at which
// positions.
//
//   word -> source -> {positions}
//
// BTreeMap/BTreeSet keep everything sorted, which gives us two things for free:
// - JSON output comes out in a stable, alphabetical order
// - partial (prefix) search is a range scan starting at the prefix
//
// This type is NOT thread-safe on its own; see concurrent.rs for the shared
// version used by the crawler and the searcher.
// =============================================================================

use super::result::SearchResult;
use crate::words;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::ops::Bound;

type Postings = BTreeMap<String, BTreeSet<usize>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    words: BTreeMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `word` appears at `position` in `source`.
    pub fn add(&mut self, word: &str, position: usize, source: &str) {
        self.words
            .entry(word.to_string())
            .or_default()
            .entry(source.to_string())
            .or_default()
            .insert(position);
    }

    /// Adds a page worth of words with 1-based running positions and returns
    /// how many words were added.
    ///
    /// Words are cleaned first; a word that cleans to nothing is skipped but
    /// still consumes a position.
    pub fn add_all<S: AsRef<str>>(&mut self, page_words: &[S], source: &str) -> usize {
        let mut added = 0;
        for (offset, word) in page_words.iter().enumerate() {
            let cleaned = words::clean(word.as_ref());
            if !cleaned.is_empty() {
                self.add(&cleaned, offset + 1, source);
                added += 1;
            }
        }
        added
    }

    /// Moves every entry of `other` into this index
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, postings) in other.words {
            let target = self.words.entry(word).or_default();
            for (source, positions) in postings {
                target.entry(source).or_default().extend(positions);
            }
        }
    }

    pub fn contains(&self, word: &str, source: &str) -> bool {
        self.words
            .get(word)
            .is_some_and(|postings| postings.contains_key(source))
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sources containing one of `queries` exactly.
    pub fn exact_search<S: AsRef<str>>(&self, queries: &[S]) -> Vec<SearchResult> {
        let mut hits = HashMap::new();
        for query in unique(queries) {
            if let Some(postings) = self.words.get(query) {
                collect(&mut hits, postings);
            }
        }
        rank(hits)
    }

    /// Sources containing a word that starts with one of `queries`.
    pub fn partial_search<S: AsRef<str>>(&self, queries: &[S]) -> Vec<SearchResult> {
        let mut hits = HashMap::new();
        for query in unique(queries) {
            let range = self
                .words
                .range::<str, _>((Bound::Included(query), Bound::Unbounded));
            for (word, postings) in range {
                if !word.starts_with(query) {
                    break;
                }
                collect(&mut hits, postings);
            }
        }
        rank(hits)
    }

    /// Writes the index as pretty JSON: { word: { source: [positions] } }
    pub fn to_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.words)
    }
}

// Query terms with duplicates removed, so "cat cat" does not double count
fn unique<S: AsRef<str>>(queries: &[S]) -> BTreeSet<&str> {
    queries
        .iter()
        .map(|query| query.as_ref())
        .filter(|query| !query.is_empty())
        .collect()
}

fn collect(hits: &mut HashMap<String, SearchResult>, postings: &Postings) {
    for (source, positions) in postings {
        hits.entry(source.clone())
            .or_insert_with(|| SearchResult::new(source.as_str()))
            .record(positions);
    }
}

fn rank(hits: HashMap<String, SearchResult>) -> Vec<SearchResult> {
    let mut results: Vec<_> = hits.into_values().collect();
    results.sort();
    results
}
