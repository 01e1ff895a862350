//! Utility modules for the search term auditor
//!
//! This module contains the thin I/O layer around the core: report discovery
//! and output naming, CSV reading and writing, and summary formatting.

pub mod file_utils;
pub mod output_formatter;
pub mod report_io;
