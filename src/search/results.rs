// src/search/results.rs
// =============================================================================
// The shared map from query key to search results.
//
// Worker tasks write into it concurrently, so every insert goes through one
// Mutex around the whole BTreeMap. Per-key locking would not help here: a
// BTreeMap insert can rebalance the tree, which touches other keys.
//
// Because it's a BTreeMap, iteration and JSON output are always sorted by key,
// no matter which task finished first.
// =============================================================================

use crate::error::SearchError;
use crate::index::SearchResult;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Cheap to clone: every clone points at the same map.
#[derive(Debug, Clone, Default)]
pub struct ResultMap {
    inner: Arc<Mutex<BTreeMap<String, Vec<SearchResult>>>>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the results for `key`, replacing any previous value.
    pub fn insert(&self, key: String, results: Vec<SearchResult>) {
        self.inner.lock().insert(key, results);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// A copy of the current contents, sorted by key
    pub fn snapshot(&self) -> BTreeMap<String, Vec<SearchResult>> {
        self.inner.lock().clone()
    }

    /// Writes the map as pretty JSON, keys in lexicographic order
    pub fn to_json<W: Write>(&self, writer: W) -> Result<(), SearchError> {
        serde_json::to_writer_pretty(writer, &*self.inner.lock())?;
        Ok(())
    }

    /// Creates (or truncates) `path` and writes the map into it
    pub fn write_json(&self, path: &Path) -> Result<(), SearchError> {
        let output = |source| SearchError::Output {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(output)?;
        let mut writer = BufWriter::new(file);
        self.to_json(&mut writer)?;
        writer.flush().map_err(output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hit(source: &str) -> SearchResult {
        SearchResult {
            source: source.to_string(),
            count: 1,
            index: 1,
        }
    }

    #[test]
    fn test_concurrent_inserts_to_distinct_keys() {
        let map = ResultMap::new();
        let handles: Vec<_> = (0..16)
            .map(|n| {
                let map = map.clone();
                thread::spawn(move || map.insert(format!("key{:02}", n), vec![hit("src")]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.len(), 16);
        let keys: Vec<_> = map.snapshot().into_keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_duplicate_insert_overwrites() {
        let map = ResultMap::new();
        map.insert("cat".to_string(), vec![hit("a")]);
        map.insert("cat".to_string(), vec![hit("a")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.snapshot()["cat"], vec![hit("a")]);
    }

    #[test]
    fn test_json_is_sorted_by_key() {
        let map = ResultMap::new();
        map.insert("zebra".to_string(), vec![]);
        map.insert("apple".to_string(), vec![hit("https://a.com/")]);

        let mut out = Vec::new();
        map.to_json(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.find("apple").unwrap() < text.find("zebra").unwrap());
        assert!(text.contains("\"where\": \"https://a.com/\""));
    }

    #[test]
    fn test_write_json_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("results.json");
        let err = ResultMap::new().write_json(&path).unwrap_err();
        assert!(matches!(err, SearchError::Output { .. }));
    }
}
