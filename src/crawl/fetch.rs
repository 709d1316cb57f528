// src/crawl/fetch.rs
// =============================================================================
// Everything that touches the network goes through the `PageSource` trait.
//
// The crawler fetches each page twice: once to list its links and once to
// pull out its words (`list_links` and `fetch_words` below). Both go through
// `fetch_page`, so wrapping a source in `CachedSource` turns that into a
// single download without the crawler noticing.
//
// A fetched `Page` carries the URL it was finally served from. After a
// redirect that differs from the requested one, and relative links must be
// resolved against it. The index still files words under the requested URL.
//
// Implementations:
// - HttpSource: real HTTP via reqwest
// - CachedSource: remembers pages it already fetched
// - MemorySource: fixed pages held in memory (tests and offline runs)
// =============================================================================

use super::html::{extract_links, extract_words};
use crate::error::FetchError;
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// A downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Where the body came from, after following redirects
    pub url: String,
    pub html: String,
}

/// Something that can hand back the HTML of a URL.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

// Fetches url and returns its visible words
//
// Parameters:
//   source: where the page comes from
//   url: the page to fetch
//
// Returns: the cleaned words in document order, or why the fetch failed
pub async fn fetch_words<S: PageSource>(source: &S, url: &str) -> Result<Vec<String>, FetchError> {
    let page = source.fetch_page(url).await?;
    Ok(extract_words(&page.html))
}

// Fetches url and returns the absolute http(s) links on it
//
// Parameters:
//   source: where the page comes from
//   url: the page to fetch
//
// Returns: links resolved against the URL the page was finally served from
//
// Example:
//   url = "https://old.com/blog", redirected to "https://new.com/posts/"
//   html = "<a href='first'>First</a>"
//   result = ["https://new.com/posts/first"]
pub async fn list_links<S: PageSource>(source: &S, url: &str) -> Result<Vec<String>, FetchError> {
    let page = source.fetch_page(url).await?;
    extract_links(&page.html, &page.url)
}

/// Plain HTTP(S) fetching with reqwest.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> reqwest::Result<Self> {
        // We'll reuse this client for all requests (connection pooling)
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::MalformedUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Io {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        // text() consumes the response, so grab the final URL first
        let final_url = response.url().to_string();
        if final_url != url {
            log::debug!("{} redirected to {}", url, final_url);
        }
        let html = response.text().await.map_err(|e| categorize_error(url, e))?;
        Ok(Page {
            url: final_url,
            html,
        })
    }
}

// Maps a reqwest error onto our FetchError kinds.
//
// reqwest doesn't expose DNS failures as their own kind, so we look for
// "dns" in the connect error text.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    let error_string = error.to_string();
    let detail = format!("{:?}", error);

    if error.is_builder() {
        FetchError::MalformedUrl {
            url,
            reason: error_string,
        }
    } else if error.is_connect() && (error_string.contains("dns") || detail.contains("dns")) {
        FetchError::HostUnresolved { url }
    } else if error.is_timeout() {
        FetchError::Io {
            url,
            reason: "request timed out".to_string(),
        }
    } else if error.is_redirect() {
        FetchError::Io {
            url,
            reason: "too many redirects".to_string(),
        }
    } else {
        FetchError::Io {
            url,
            reason: error_string,
        }
    }
}

/// Remembers every successful fetch, keyed by the requested URL.
///
/// Failed fetches are not cached.
pub struct CachedSource<S> {
    inner: S,
    pages: Mutex<HashMap<String, Page>>,
}

impl<S: PageSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct pages held
    pub fn len(&self) -> usize {
        self.pages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.lock().is_empty()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: PageSource> PageSource for CachedSource<S> {
    async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        // Copy out first so the lock is released before the await below
        let cached = self.pages.lock().get(url).cloned();
        if let Some(page) = cached {
            log::debug!("page cache hit for {}", url);
            return Ok(page);
        }

        let page = self.inner.fetch_page(url).await?;
        self.pages.lock().insert(url.to_string(), page.clone());
        Ok(page)
    }
}

/// A fixed set of pages served from memory. Unknown URLs fail like an
/// unresolvable host would. Counts how often each URL was requested.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    requests: Mutex<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a page
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Serves the page at `to` whenever `from` is requested
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// How many times `url` has been fetched so far
    pub fn requests(&self, url: &str) -> usize {
        self.requests.lock().get(url).copied().unwrap_or(0)
    }
}

impl PageSource for MemorySource {
    async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        *self.requests.lock().entry(url.to_string()).or_insert(0) += 1;
        let target = self.redirects.get(url).map_or(url, String::as_str);
        let html = self
            .pages
            .get(target)
            .ok_or_else(|| FetchError::HostUnresolved {
                url: url.to_string(),
            })?;
        Ok(Page {
            url: target.to_string(),
            html: html.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MemorySource {
        MemorySource::new().with_page(
            "https://example.com/",
            r#"<p>Hello links</p><a href="/a">A</a><a href="https://other.com/b">B</a>"#,
        )
    }

    #[tokio::test]
    async fn test_list_links_and_fetch_words_each_fetch() {
        let source = source();
        let links = list_links(&source, "https://example.com/").await.unwrap();
        let words = fetch_words(&source, "https://example.com/").await.unwrap();

        assert_eq!(links, vec!["https://example.com/a", "https://other.com/b"]);
        assert_eq!(words, vec!["hello", "links", "a", "b"]);
        assert_eq!(source.requests("https://example.com/"), 2);
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once() {
        let cached = CachedSource::new(source());
        list_links(&cached, "https://example.com/").await.unwrap();
        fetch_words(&cached, "https://example.com/").await.unwrap();

        assert_eq!(cached.inner().requests("https://example.com/"), 1);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_cached_source_does_not_cache_failures() {
        let cached = CachedSource::new(MemorySource::new());
        assert!(cached.fetch_page("https://missing.com/").await.is_err());
        assert!(cached.fetch_page("https://missing.com/").await.is_err());

        assert!(cached.is_empty());
        assert_eq!(cached.inner().requests("https://missing.com/"), 2);
    }

    #[tokio::test]
    async fn test_http_source_rejects_malformed_url() {
        let source = HttpSource::new().unwrap();
        let err = source.fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedUrl { .. }));
    }

    #[tokio::test]
    async fn test_links_resolve_against_redirect_target() {
        let source = MemorySource::new()
            .with_redirect("https://old.com/blog", "https://new.com/posts/")
            .with_page("https://new.com/posts/", r#"<a href="first">First</a>"#);

        let page = source.fetch_page("https://old.com/blog").await.unwrap();
        assert_eq!(page.url, "https://new.com/posts/");

        let links = list_links(&source, "https://old.com/blog").await.unwrap();
        assert_eq!(links, vec!["https://new.com/posts/first"]);
        assert_eq!(source.requests("https://old.com/blog"), 2);
    }

    #[tokio::test]
    async fn test_cached_source_keeps_final_url() {
        let cached = CachedSource::new(
            MemorySource::new()
                .with_redirect("https://old.com/", "https://new.com/")
                .with_page("https://new.com/", r#"<a href="/x">x</a>"#),
        );
        list_links(&cached, "https://old.com/").await.unwrap();
        let links = list_links(&cached, "https://old.com/").await.unwrap();

        assert_eq!(links, vec!["https://new.com/x"]);
        assert_eq!(cached.inner().requests("https://old.com/"), 1);
    }
}
