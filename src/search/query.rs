// src/search/query.rs
// =============================================================================
// Turns one line of a query file into a normalized Query.
//
// Steps:
// 1. clean the line (lowercase, strip punctuation, trim)
// 2. split on whitespace
// 3. sort the terms
//
// The key is the sorted terms joined by single spaces, so "Dog cat" and
// "cat, DOG!" both become "cat dog". Repeated words are kept: the key depends
// on the multiset of words, not just the set.
// =============================================================================

use crate::words;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Normalizes `line`. Returns None if nothing is left after cleaning.
    pub fn parse(line: &str) -> Option<Self> {
        let mut terms = words::split_words(line);
        if terms.is_empty() {
            return None;
        }
        terms.sort();
        Some(Self { terms })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The canonical key used in the result map
    pub fn key(&self) -> String {
        self.terms.join(" ")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_order_does_not_matter() {
        let a = Query::parse("Cat Dog").unwrap();
        let b = Query::parse("dog cat").unwrap();
        assert_eq!(a.key(), "cat dog");
        assert_eq!(a, b);
    }

    #[test]
    fn test_punctuation_and_spacing_are_ignored() {
        let query = Query::parse("  Hello,   WORLD!! ").unwrap();
        assert_eq!(query.key(), "hello world");
        assert_eq!(query.terms(), &["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_blank_lines_produce_nothing() {
        assert!(Query::parse("").is_none());
        assert!(Query::parse("   \t ").is_none());
        assert!(Query::parse("?!...").is_none());
    }

    #[test]
    fn test_repeated_words_are_kept() {
        assert_eq!(Query::parse("cat dog cat").unwrap().key(), "cat cat dog");
    }

    proptest! {
        #[test]
        fn prop_key_is_invariant_under_reordering(
            words in prop::collection::vec("[a-zA-Z]{1,8}", 1..8),
            seed in any::<u64>(),
        ) {
            let forward = words.join(" ");

            // Deterministic shuffle: rotate then reverse
            let mut shuffled = words.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
            let reordered = shuffled.join(" ");

            let a = Query::parse(&forward).unwrap();
            let b = Query::parse(&reordered).unwrap();
            prop_assert_eq!(a.key(), b.key());
        }
    }
}
