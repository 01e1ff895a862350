//! Bid match types and keyword normalization
//!
//! Each match type decorates its keyword differently in the report
//! (`[exact]`, `"phrase"`, `+broad +modifier`). Normalization strips that
//! decoration so the keyword can be compared word by word with the search term.

use std::fmt;

/// Match type of a report row, read from the `BidMatchType` cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
    /// Any value the audit has no special handling for
    Other,
}

impl MatchType {
    /// Classify a raw `BidMatchType` cell. Comparison is exact and
    /// case-sensitive, as the report exporter writes these values verbatim.
    pub fn from_cell(value: &str) -> Self {
        match value {
            "Exact" => MatchType::Exact,
            "Phrase" => MatchType::Phrase,
            "Broad" => MatchType::Broad,
            _ => MatchType::Other,
        }
    }

    /// Characters this match type uses to decorate a keyword
    fn decoration(self) -> &'static [char] {
        match self {
            MatchType::Exact => &['[', ']'],
            MatchType::Phrase => &['"'],
            MatchType::Broad => &['+'],
            MatchType::Other => &[],
        }
    }

    /// Strip match type decoration from an already lowercased keyword.
    pub fn normalize(self, keyword: &str) -> String {
        let decoration = self.decoration();
        if decoration.is_empty() {
            return keyword.to_string();
        }
        keyword.chars().filter(|c| !decoration.contains(c)).collect()
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchType::Exact => "Exact",
            MatchType::Phrase => "Phrase",
            MatchType::Broad => "Broad",
            MatchType::Other => "Other",
        };
        f.write_str(name)
    }
}
