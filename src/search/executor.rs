// src/search/executor.rs
// =============================================================================
// Runs every query of a query file against the index, in parallel.
//
// How it works:
// 1. Read the source one line at a time
// 2. Normalize each line into a Query (blank lines are skipped)
// 3. Submit one task per query to the WorkQueue
// 4. Each task searches the index and stores (key, results) in the ResultMap
// 5. Wait for the queue to drain, so the map is complete before anyone reads it
//
// If reading fails halfway, we stop reading but still wait for the queries
// that were already submitted. Lines after the failure are lost.
// =============================================================================

use super::query::Query;
use super::results::ResultMap;
use crate::error::SearchError;
use crate::index::{Index, SearchResult};
use crate::pool::WorkQueue;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct QueryExecutor<I: Index + 'static> {
    index: Arc<I>,
    results: ResultMap,
    queue: WorkQueue,
}

impl<I: Index + 'static> QueryExecutor<I> {
    /// Starts `threads` workers; fails only if the OS refuses to spawn one.
    pub fn new(index: Arc<I>, threads: usize) -> std::io::Result<Self> {
        Ok(Self {
            index,
            results: ResultMap::new(),
            queue: WorkQueue::new(threads)?,
        })
    }

    /// Opens `path` (UTF-8, one query per line) and runs every query in it.
    pub fn parse_query_file(&self, path: &Path, exact: bool) -> Result<usize, SearchError> {
        log::info!(
            "reading queries from {} on {} thread(s)",
            path.display(),
            self.queue.size()
        );
        let file = File::open(path).map_err(|source| SearchError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_queries(BufReader::new(file), path, exact)
    }

    /// Runs every query read from `reader`; `origin` is only used in errors.
    ///
    /// Returns how many queries were submitted. All submitted queries have
    /// finished when this returns, on success and on failure alike.
    pub fn parse_queries<R: BufRead>(
        &self,
        reader: R,
        origin: &Path,
        exact: bool,
    ) -> Result<usize, SearchError> {
        let outcome = self.submit_lines(reader, origin, exact);
        self.queue.finish();

        match &outcome {
            Ok(count) => log::info!("{} queries completed", count),
            Err(e) => log::error!("query phase truncated: {}", e),
        }
        outcome
    }

    fn submit_lines<R: BufRead>(
        &self,
        reader: R,
        origin: &Path,
        exact: bool,
    ) -> Result<usize, SearchError> {
        let mut submitted = 0;

        for line in reader.lines() {
            let line = line.map_err(|source| SearchError::SourceUnavailable {
                path: PathBuf::from(origin),
                source,
            })?;

            let Some(query) = Query::parse(&line) else {
                continue;
            };
            self.submit(query, exact)?;
            submitted += 1;
        }

        Ok(submitted)
    }

    fn submit(&self, query: Query, exact: bool) -> Result<(), SearchError> {
        let index = Arc::clone(&self.index);
        let results = self.results.clone();
        log::debug!("task created for '{}'", query);

        self.queue.execute(move || {
            let found = index.search(query.terms(), exact);
            log::debug!("task for '{}' found {} result(s)", query, found.len());
            results.insert(query.key(), found);
            Ok(())
        })
    }

    /// The shared result map (complete once a parse call has returned)
    pub fn result_map(&self) -> &ResultMap {
        &self.results
    }

    /// A sorted copy of all results so far
    pub fn results(&self) -> BTreeMap<String, Vec<SearchResult>> {
        self.results.snapshot()
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SearchError> {
        log::info!("writing {} result set(s) to {}", self.results.len(), path.display());
        self.results.write_json(path)
    }

    /// Stops the worker threads. Also happens automatically on drop.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ConcurrentIndex;
    use std::io::{self, Cursor, Read, Write};

    fn page(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn sample_index() -> Arc<ConcurrentIndex> {
        let index = ConcurrentIndex::new();
        index.add_page(&page("the cat and the dog"), "https://a.com/");
        index.add_page(&page("cats love fish"), "https://b.com/");
        Arc::new(index)
    }

    fn run(text: &str, exact: bool) -> (Result<usize, SearchError>, BTreeMap<String, Vec<SearchResult>>) {
        let executor = QueryExecutor::new(sample_index(), 3).unwrap();
        let outcome = executor.parse_queries(Cursor::new(text), Path::new("test"), exact);
        (outcome, executor.results())
    }

    // Hands out `data`, then fails every read after that
    struct FailAfter {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "disk went away")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_reordered_duplicates_share_one_key() {
        let (outcome, results) = run("Cat Dog\ndog cat\n", true);
        assert_eq!(outcome.unwrap(), 2);
        assert_eq!(results.len(), 1);
        assert!(results.contains_key("cat dog"));
    }

    #[test]
    fn test_blank_line_contributes_nothing() {
        let (_, results) = run("cat\n\n   \nfish\n", true);
        assert_eq!(results.len(), 2);
        assert!(results.contains_key("cat"));
        assert!(results.contains_key("fish"));
    }

    #[test]
    fn test_duplicate_value_matches_direct_search() {
        let index = sample_index();
        let executor = QueryExecutor::new(Arc::clone(&index), 4).unwrap();
        executor
            .parse_queries(Cursor::new("CAT\ncat\ncat!\n"), Path::new("test"), false)
            .unwrap();

        let expected = index.search(&["cat".to_string()], false);
        assert_eq!(executor.results()["cat"], expected);
        assert_eq!(expected.len(), 2);
    }

    #[test]
    fn test_exact_and_partial_modes() {
        let (_, exact) = run("cat\n", true);
        let (_, partial) = run("cat\n", false);
        assert_eq!(exact["cat"].len(), 1);
        assert_eq!(partial["cat"].len(), 2);
    }

    #[test]
    fn test_unknown_words_map_to_empty_results() {
        let (_, results) = run("zebra\n", true);
        assert_eq!(results["zebra"], Vec::<SearchResult>::new());
    }

    #[test]
    fn test_one_entry_per_distinct_key_with_many_queries() {
        let mut text = String::new();
        for n in 0..200 {
            text.push_str(&format!("word{} the\n", n % 50));
        }
        let (outcome, results) = run(&text, false);
        assert_eq!(outcome.unwrap(), 200);
        assert_eq!(results.len(), 50);
    }

    #[test]
    fn test_read_failure_keeps_dispatched_queries() {
        let executor = QueryExecutor::new(sample_index(), 2).unwrap();
        let reader = BufReader::new(FailAfter {
            data: Cursor::new(b"cat\ndog\n".to_vec()),
        });

        let err = executor
            .parse_queries(reader, Path::new("queries.txt"), true)
            .unwrap_err();

        assert!(matches!(err, SearchError::SourceUnavailable { .. }));
        let results = executor.results();
        assert_eq!(results.len(), 2);
        assert!(results.contains_key("cat"));
        assert!(results.contains_key("dog"));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let executor = QueryExecutor::new(sample_index(), 1).unwrap();
        let err = executor
            .parse_query_file(Path::new("/definitely/not/here.txt"), true)
            .unwrap_err();
        assert!(matches!(err, SearchError::SourceUnavailable { .. }));
        assert!(executor.results().is_empty());
    }

    #[test]
    fn test_query_file_and_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let queries = dir.path().join("queries.txt");
        let mut file = File::create(&queries).unwrap();
        writeln!(file, "the dog").unwrap();
        writeln!(file, "Fish").unwrap();
        drop(file);

        let executor = QueryExecutor::new(sample_index(), 2).unwrap();
        assert_eq!(executor.parse_query_file(&queries, true).unwrap(), 2);

        let output = dir.path().join("results.json");
        executor.write_json(&output).unwrap();
        executor.shutdown();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["dog the"][0]["where"], "https://a.com/");
        assert_eq!(json["dog the"][0]["count"], 3);
        assert_eq!(json["dog the"][0]["index"], 1);
        assert_eq!(json["fish"][0]["where"], "https://b.com/");
    }

    #[test]
    fn test_results_accumulate_across_calls() {
        let executor = QueryExecutor::new(sample_index(), 2).unwrap();
        executor
            .parse_queries(Cursor::new("cat\n"), Path::new("a"), true)
            .unwrap();
        executor
            .parse_queries(Cursor::new("fish\n"), Path::new("b"), true)
            .unwrap();
        assert_eq!(executor.result_map().len(), 2);
    }
}
