// src/words.rs
// =============================================================================
// Word cleaning shared by the crawler (page text) and the searcher (queries).
//
// Both sides MUST clean text the same way, otherwise a query word would never
// match the indexed form of the same word.
// =============================================================================

/// Lowercases, removes ASCII punctuation and trims surrounding whitespace.
///
/// Example: "  Hello, World!  " -> "hello world"
pub fn clean(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cleans `text` and splits it on whitespace. Never yields empty strings.
pub fn split_words(text: &str) -> Vec<String> {
    clean(text).split_whitespace().map(str::to_string).collect()
}
