//! Word frequency over the whole document.

use crate::output::WordCount;
use crate::pipeline::stopwords::StopwordSet;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Counted words plus the size of the token stream they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequency {
    /// Most frequent first; ties keep first-seen order.
    pub words: Vec<WordCount>,
    /// Tokens that survived stopword and length exclusion.
    pub meaningful_tokens: usize,
}

/// Lowercase, fold the dotted `i̇` that `İ` lowercases to, strip punctuation
/// and split on whitespace.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase().replace("i\u{307}", "i");
    RE_PUNCT
        .replace_all(&lowered, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Count non-stopword tokens of at least `min_len` characters and keep the
/// `top_n` most frequent.
pub fn count_words(text: &str, stopwords: &StopwordSet, min_len: usize, top_n: usize) -> WordFrequency {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut meaningful = 0usize;

    for token in normalize(text) {
        if token.chars().count() < min_len || stopwords.contains(&token) {
            continue;
        }
        meaningful += 1;
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    // Stable, so equal counts stay in first-seen order.
    words.sort_by(|a, b| b.count.cmp(&a.count));
    words.truncate(top_n);

    WordFrequency {
        words,
        meaningful_tokens: meaningful,
    }
}
