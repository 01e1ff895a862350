//! Stop word set used to classify dropped keyword words
//!
//! The default list is prepositions and a few conjunctions. Callers can
//! replace it through `AuditConfig::stop_words`.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Default function words, in the order the audit has always shipped them.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "aboard", "about", "above", "across", "after", "against", "along", "amid", "among", "anti",
    "around", "as", "at", "before", "behind", "below", "beneath", "beside", "besides", "between",
    "beyond", "but", "by", "concerning", "considering", "despite", "down", "during", "except",
    "excepting", "excluding", "following", "for", "from", "in", "inside", "into", "like",
    "minus", "near", "of", "off", "on", "onto", "opposite", "outside", "over", "past", "per",
    "plus", "regarding", "round", "save", "since", "than", "through", "to", "toward", "towards",
    "under", "underneath", "unlike", "until", "up", "upon", "versus", "via", "with", "within",
    "without",
];

lazy_static! {
    static ref DEFAULT_SET: HashSet<String> =
        DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect();
}

/// Read-only set of stop words shared by every row of a run
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build a set from an arbitrary word list. Words are lowercased so they
    /// compare against case-folded keywords.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self {
            words: DEFAULT_SET.clone(),
        }
    }
}
