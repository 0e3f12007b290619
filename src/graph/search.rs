//! Token search over block text.
//!
//! Queries split on whitespace. Each lowercased word of indexed text is a
//! key, and so is each alphanumeric piece of a word that punctuation
//! splits, so `theme:sea` is found by `theme:sea`, `theme`, and `sea`. A
//! query token matches every key it is a prefix of (OR across those keys);
//! multiple query tokens are intersected (AND).

use std::collections::{BTreeMap, BTreeSet};
use std::iter;

/// Token → block index set.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: BTreeMap<String, BTreeSet<usize>>,
}

impl SearchIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every key of `text` for `block`.
    pub fn insert_text(&mut self, block: usize, text: &str) {
        for key in index_keys(text) {
            let _ = self.entries.entry(key).or_default().insert(block);
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blocks matching every token of `query`, ascending.
    ///
    /// An empty or whitespace-only query matches nothing.
    pub fn query(&self, query: &str) -> Vec<usize> {
        let mut result: Option<BTreeSet<usize>> = None;
        for token in query_tokens(query) {
            let matches = self.prefix_matches(&token);
            let next = match result {
                None => matches,
                Some(acc) => acc.intersection(&matches).copied().collect(),
            };
            if next.is_empty() {
                return Vec::new();
            }
            result = Some(next);
        }
        result.map(|set| set.into_iter().collect()).unwrap_or_default()
    }

    fn prefix_matches(&self, prefix: &str) -> BTreeSet<usize> {
        self.entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .flat_map(|(_, blocks)| blocks.iter().copied())
            .collect()
    }
}

/// Lowercased whitespace-separated words.
pub fn query_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Keys indexed for `text`: every word whole, then its alphanumeric
/// pieces when punctuation splits it.
pub fn index_keys(text: &str) -> impl Iterator<Item = String> + '_ {
    query_tokens(text).flat_map(|word| {
        let pieces: Vec<String> = word
            .split(|c: char| !c.is_alphanumeric())
            .filter(|piece| !piece.is_empty() && *piece != word)
            .map(str::to_owned)
            .collect();
        iter::once(word).chain(pieces)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        let mut idx = SearchIndex::new();
        idx.insert_text(0, "A cat sleeping");
        idx.insert_text(1, "dog and cat");
        idx.insert_text(2, "Catalog of dogs");
        idx.insert_text(3, "birds");
        idx
    }

    #[test]
    fn prefix_matches_union_keys() {
        assert_eq!(index().query("cat"), vec![0, 1, 2]);
    }

    #[test]
    fn tokens_intersect() {
        assert_eq!(index().query("cat dog"), vec![1, 2]);
    }

    #[test]
    fn token_order_does_not_matter() {
        let idx = index();
        assert_eq!(idx.query("cat dog"), idx.query("dog cat"));
        assert_eq!(idx.query("  DOG   cat "), idx.query("cat dog"));
    }

    #[test]
    fn empty_and_missing_queries() {
        let idx = index();
        assert!(idx.query("").is_empty());
        assert!(idx.query("   ").is_empty());
        assert!(idx.query("zebra").is_empty());
        assert!(idx.query("cat zebra").is_empty());
    }

    #[test]
    fn keys_keep_whole_words_and_their_pieces() {
        let keys: Vec<String> = index_keys("artist:Jane-Doe zine").collect();
        assert_eq!(keys, vec!["artist:jane-doe", "artist", "jane", "doe", "zine"]);
    }

    #[test]
    fn queries_split_on_whitespace_only() {
        let tokens: Vec<String> = query_tokens(" Theme:Sea\tink ").collect();
        assert_eq!(tokens, vec!["theme:sea", "ink"]);
    }

    #[test]
    fn punctuated_queries_match_whole_keys() {
        let mut idx = index();
        idx.insert_text(4, "theme:sea");
        idx.insert_text(5, "theme:sky");
        assert_eq!(idx.query("theme:sea"), vec![4]);
        assert_eq!(idx.query("theme:s"), vec![4, 5]);
        assert_eq!(idx.query("sea"), vec![4]);
        assert!(idx.query("theme:sea cat").is_empty());
    }
}
