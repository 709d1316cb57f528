// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option is a flag; a run can crawl, query, or do both:
//
//   page-searcher --url https://example.com --query queries.txt --results
//
// The crawl always runs first, so queries see the fully built index.
// =============================================================================

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use page_searcher::crawl::MAX_LINKS;
use page_searcher::pool::WorkQueue;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-searcher",
    version = "0.1.0",
    about = "Crawl a handful of web pages into a word index and run search queries against it",
    long_about = "page-searcher crawls up to --max-links pages starting from --url, indexes every \
                  word it finds, then runs each line of the --query file as a search on a pool \
                  of worker threads. Results are written as JSON, sorted by query."
)]
pub struct Cli {
    /// Seed URL to start crawling from
    #[arg(long)]
    pub url: Option<String>,

    /// Query file, one search per line
    #[arg(long)]
    pub query: Option<PathBuf>,

    /// Only match whole words (default matches word prefixes)
    #[arg(long)]
    pub exact: bool,

    /// Number of worker threads used to run queries
    #[arg(
        long,
        default_value_t = WorkQueue::DEFAULT_THREADS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub threads: usize,

    /// Maximum number of distinct pages to crawl
    #[arg(
        long,
        default_value_t = MAX_LINKS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_links: usize,

    /// Write search results as JSON (default file: results.json)
    #[arg(long, num_args = 0..=1, default_missing_value = "results.json")]
    pub results: Option<PathBuf>,

    /// Write the word index as JSON (default file: index.json)
    #[arg(long, num_args = 0..=1, default_missing_value = "index.json")]
    pub index: Option<PathBuf>,

    /// Download each crawled page once instead of twice
    #[arg(long)]
    pub cache_pages: bool,
}
