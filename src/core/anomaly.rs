//! Match type specific anomaly checks
//!
//! The acronym check runs on every row. The phrase and anchor checks only
//! mean something for their own match type and report "not applicable"
//! otherwise.

use crate::core::lexical_diff::tokens;
use crate::core::match_type::MatchType;

/// Outcome of the broad match modifier anchor check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorCheck {
    NotBroadMatch,
    NoneDropped,
    /// Dropped anchors, each prefixed with `+`
    Dropped(Vec<String>),
}

/// True when the initials of the keyword's words appear as a whole word of
/// the search term ("wide fit running shoes" -> "wfrs").
pub fn acronym_in_search_term(keyword: &str, search_term: &str) -> bool {
    let acronym: String = tokens(keyword).filter_map(|word| word.chars().next()).collect();
    tokens(search_term).any(|word| word == acronym)
}

/// `Some(true)` when a phrase match keyword is not contained in the search
/// term, `None` for other match types.
pub fn phrase_missing(match_type: MatchType, raw_keyword: &str, search_term: &str) -> Option<bool> {
    if match_type != MatchType::Phrase {
        return None;
    }
    let phrase = MatchType::Phrase.normalize(raw_keyword);
    Some(!search_term.contains(phrase.as_str()))
}

/// Find `+anchor` words of a broad match keyword that are not words of the
/// search term.
pub fn dropped_anchors(match_type: MatchType, raw_keyword: &str, search_term: &str) -> AnchorCheck {
    if match_type != MatchType::Broad {
        return AnchorCheck::NotBroadMatch;
    }

    let mut dropped: Vec<String> = Vec::new();
    for word in tokens(raw_keyword).filter(|word| word.contains('+')) {
        let anchor = MatchType::Broad.normalize(word);
        let present = tokens(search_term).any(|token| token == anchor);
        let display = format!("+{}", anchor);
        if !present && !dropped.contains(&display) {
            dropped.push(display);
        }
    }

    if dropped.is_empty() {
        AnchorCheck::NoneDropped
    } else {
        AnchorCheck::Dropped(dropped)
    }
}
