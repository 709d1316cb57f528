// src/error.rs
// =============================================================================
// Error types shared by the crawl and search halves of the tool.
//
// There are three kinds of failure and they are handled very differently:
// - FetchError: one URL could not be fetched or parsed. It is logged and the
//   crawl moves on to the next URL.
// - SearchError::SourceUnavailable: the query file could not be opened or a
//   read failed. This is the only failure that stops a whole phase.
// - Task failures: a worker task returned an error or panicked. The pool logs
//   it and keeps going (see pool/work_queue.rs), so there is no variant here.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error for us
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a single URL could not be crawled.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The string could not be parsed as an absolute URL
    #[error("malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// DNS lookup for the host failed
    #[error("could not resolve host for '{url}'")]
    HostUnresolved { url: String },

    /// Connection, timeout, body read or non-success HTTP status
    #[error("I/O failure fetching '{url}': {reason}")]
    Io { url: String, reason: String },

    /// A link on the page could not be resolved against the page URL
    #[error("bad link syntax on '{url}': {reason}")]
    UriSyntax { url: String, reason: String },
}

impl FetchError {
    /// The URL this failure belongs to
    pub fn url(&self) -> &str {
        match self {
            FetchError::MalformedUrl { url, .. }
            | FetchError::HostUnresolved { url }
            | FetchError::Io { url, .. }
            | FetchError::UriSyntax { url, .. } => url,
        }
    }
}

/// Failures of the query side and of writing output.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query source could not be opened or a read failed mid-stream
    #[error("query source '{}' is unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A task was submitted after the work queue was shut down
    #[error("work queue has been shut down")]
    QueueClosed,

    /// An output file could not be created or written
    #[error("could not write '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
