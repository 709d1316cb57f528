// src/crawl/html.rs
// =============================================================================
// Pulls the two things the crawler needs out of an HTML page:
// - the words a reader would see (for the index)
// - the links it points to (for the frontier)
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative links to absolute URLs.
// =============================================================================

use crate::error::FetchError;
use crate::words;
use scraper::{Html, Selector};
use url::Url;

// Elements whose text never shows up on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

// Extracts the words a reader would see on the page
//
// Parameters:
//   html: the HTML content to parse
//
// Returns: Vec<String> of cleaned words, in document order
//
// Example:
//   html = "<p>Hello, <b>World</b>!</p><script>var x;</script>"
//   result = ["hello", "world"]
pub fn extract_words(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            // Separate text nodes so "<b>a</b><i>b</i>" doesn't become "ab"
            text.push_str(fragment);
            text.push(' ');
        }
    }

    words::split_words(&text)
}

// Extracts every http(s) link on the page as an absolute URL
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL the page was served from (for resolving relative links)
//
// Returns: the links in document order, duplicates NOT removed (the frontier
//   decides what to do with them), or an error if base_url is unusable.
//   Fragments ("#section") are dropped so "page#a" and "page#b" are one URL.
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base_url = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base_url: &str) -> Result<Vec<String>, FetchError> {
    let base = Url::parse(base_url).map_err(|e| FetchError::MalformedUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if base.cannot_be_a_base() {
        return Err(FetchError::UriSyntax {
            url: base_url.to_string(),
            reason: "URL cannot be used to resolve relative links".to_string(),
        });
    }

    let document = Html::parse_document(html);
    // Our selector "a[href]" is a constant and known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(&base, href))
        .collect();

    Ok(links)
}

// Puts an absolute URL in the same form extract_links produces
//
// Parameters:
//   raw: a URL typed by the user, e.g. the crawl seed
//
// Returns: Some(normalized) or None if raw doesn't parse as a URL
//
// Example:
//   raw = "https://example.com#top"
//   result = Some("https://example.com/")
pub fn normalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}

// Resolves a possibly-relative href against the page URL
//
// Returns None for links we can't or shouldn't crawl:
//   "mailto:x@y.com", "javascript:void(0)", "tel:123", unparseable hrefs
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let mut url = match base.join(href.trim()) {
        Ok(url) => url,
        Err(e) => {
            log::debug!("skipping bad link '{}' on {}: {}", href, base, e);
            return None;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the seed normalized but not filtered?
//    - Url::parse adds the trailing "/" to a bare host, the same way join()
//      does for links, so "https://a.com" and a link to "/" meet in visited
//    - A seed that doesn't parse is kept as typed; it fails at fetch time and
//      shows up in the crawl summary
//
// 2. Why walk descendants() instead of calling .text()?
//    - .text() on the root includes <script> and <style> contents
//    - Checking each text node's ancestors lets us skip those
// -----------------------------------------------------------------------------
