//! Core module for search term auditing
//!
//! This module contains the per row analysis engine: keyword normalization,
//! similarity scoring, the word level diff, match type anomaly checks, and the
//! pipeline that ties them together.

pub mod anomaly;
pub mod lexical_diff;
pub mod match_type;
pub mod pipeline;
pub mod similarity;
pub mod stop_words;
