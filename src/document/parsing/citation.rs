//! Informal table citations
//!
//! Field logic refers to lookup data as "table 1.3", "Table-2" or
//! "Table #4". Citations are normalized to their number ("1.3") so a field
//! and a reference table can be joined on it.

use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btable\s*[-#:.]?\s*(\d+(?:\.\d+)*)").unwrap());

/// Every distinct citation in `text`, in order of appearance
pub(crate) fn extract_citations(text: &str) -> Vec<String> {
    let mut citations: Vec<String> = Vec::new();
    for captures in TABLE_CITATION.captures_iter(text) {
        if let Some(number) = captures.get(1) {
            let key = number.as_str().trim_end_matches('.').to_string();
            if !citations.contains(&key) {
                citations.push(key);
            }
        }
    }
    citations
}

pub(crate) fn first_citation(text: &str) -> Option<String> {
    extract_citations(text).into_iter().next()
}
