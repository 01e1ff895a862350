//! Word level diff between a normalized keyword and a search term

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::stop_words::StopWords;

/// How a keyword word is judged present in the search term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordContainment {
    /// The word appears anywhere in the search term text, so "run" is
    /// present in "running shoes"
    #[default]
    Substring,
    /// The word equals one of the search term's words
    Token,
}

impl WordContainment {
    fn is_present(self, word: &str, search_term: &str) -> bool {
        match self {
            WordContainment::Substring => search_term.contains(word),
            // Doubled spaces leave empty words that are not real drops
            WordContainment::Token => word.is_empty() || tokens(search_term).any(|token| token == word),
        }
    }
}

/// Result of comparing keyword words with search term words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalDiff {
    /// Keyword word count minus search term word count
    pub word_count_diff: i64,
    /// Keyword words missing from the search term, first occurrence order
    pub dropped_words: Vec<String>,
    /// Dropped words that are stop words, sorted
    pub dropped_stop_words: BTreeSet<String>,
}

/// Split on single spaces. Consecutive spaces yield empty words.
pub fn tokens(text: &str) -> std::str::Split<'_, char> {
    text.split(' ')
}

pub fn word_count_diff(keyword: &str, search_term: &str) -> i64 {
    tokens(keyword).count() as i64 - tokens(search_term).count() as i64
}

pub fn dropped_words(keyword: &str, search_term: &str, containment: WordContainment) -> Vec<String> {
    let mut dropped: Vec<String> = Vec::new();
    for word in tokens(keyword) {
        if !containment.is_present(word, search_term) && !dropped.iter().any(|d| d == word) {
            dropped.push(word.to_string());
        }
    }
    dropped
}

pub fn dropped_stop_words(dropped: &[String], stop_words: &StopWords) -> BTreeSet<String> {
    dropped
        .iter()
        .filter(|word| stop_words.contains(word))
        .cloned()
        .collect()
}

/// Run the full word level diff for one keyword / search term pair.
pub fn analyze(
    keyword: &str,
    search_term: &str,
    stop_words: &StopWords,
    containment: WordContainment,
) -> LexicalDiff {
    let dropped = dropped_words(keyword, search_term, containment);
    let dropped_stop_words = dropped_stop_words(&dropped, stop_words);

    LexicalDiff {
        word_count_diff: word_count_diff(keyword, search_term),
        dropped_words: dropped,
        dropped_stop_words,
    }
}
