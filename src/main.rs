// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG overrides the default "info" level)
// 2. Parse command-line arguments using clap
// 3. Crawl from --url into the index, if given
// 4. Run the --query file against the index on a thread pool, if given
// 5. Write results / index JSON and exit with a proper code
//    (0 = success, 1 = the query file could not be fully read, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use page_searcher::crawl::{CachedSource, CrawlFrontier, CrawlSummary, HttpSource, PageSource};
use page_searcher::index::ConcurrentIndex;
use page_searcher::search::QueryExecutor;
use page_searcher::SearchError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let index = Arc::new(ConcurrentIndex::new());

    // Crawl first, then query: searches never race with index updates
    if let Some(seed) = &cli.url {
        handle_crawl(seed, &cli, &index).await?;
    }

    let mut exit_code = 0;
    if let Some(query_file) = &cli.query {
        exit_code = handle_queries(query_file.clone(), &cli, Arc::clone(&index)).await?;
    }

    if let Some(path) = &cli.index {
        write_index(&index, path)?;
        println!("💾 Index written to {}", path.display());
    }

    Ok(exit_code)
}

// Handles --url: crawls up to --max-links pages into the index
async fn handle_crawl(seed: &str, cli: &Cli, index: &ConcurrentIndex) -> Result<()> {
    println!("🔍 Crawling from: {}", seed);
    println!("📊 Max pages: {}", cli.max_links);

    let source = HttpSource::new().context("failed to create HTTP client")?;
    let summary = if cli.cache_pages {
        let cached = CachedSource::new(source);
        let summary = crawl_with(seed, &cached, cli.max_links, index).await;
        log::info!("page cache held {} page(s)", cached.len());
        summary
    } else {
        crawl_with(seed, &source, cli.max_links, index).await
    };

    println!("📄 Crawled {} page(s)", summary.visited.len());
    println!(
        "   {} word(s) indexed, {} distinct",
        summary.words_indexed,
        index.len()
    );
    if summary.failures > 0 {
        println!("⚠️  {} fetch(es) failed (see log):", summary.failures);
        for url in &summary.failed {
            println!("   ❌ {}", url);
        }
    }
    Ok(())
}

async fn crawl_with<S: PageSource>(
    seed: &str,
    source: &S,
    max_links: usize,
    index: &ConcurrentIndex,
) -> CrawlSummary {
    CrawlFrontier::new(max_links).crawl(seed, source, index).await
}

// Handles --query: runs every line of the file as a search.
//
// The worker pool blocks while it drains, so it runs on tokio's blocking
// thread pool instead of the async executor.
async fn handle_queries(query_file: PathBuf, cli: &Cli, index: Arc<ConcurrentIndex>) -> Result<i32> {
    println!("🔎 Running queries from: {}", query_file.display());

    let exact = cli.exact;
    let threads = cli.threads;
    let results_path = cli.results.clone();

    tokio::task::spawn_blocking(move || -> Result<i32> {
        let executor = QueryExecutor::new(index, threads)
            .with_context(|| format!("failed to start {} worker thread(s)", threads))?;

        let exit_code = match executor.parse_query_file(&query_file, exact) {
            Ok(count) => {
                println!("✅ {} quer(ies) run, {} distinct", count, executor.result_map().len());
                0
            }
            Err(e @ SearchError::SourceUnavailable { .. }) => {
                // Whatever was dispatched before the failure still gets written
                println!("⚠️  {}", e);
                println!("   kept {} result set(s)", executor.result_map().len());
                1
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(path) = &results_path {
            executor
                .write_json(path)
                .with_context(|| format!("failed to write results to {}", path.display()))?;
            println!("💾 Results written to {}", path.display());
        }

        executor.shutdown();
        Ok(exit_code)
    })
    .await
    .context("query phase panicked")?
}

fn write_index(index: &ConcurrentIndex, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    index
        .to_json(&mut writer)
        .with_context(|| format!("failed to write index to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
