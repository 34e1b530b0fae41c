//! List marker handling
//!
//! Narrative sections are usually bulleted or numbered lists. Their order is
//! captured separately, so the typed markers are stripped from step text.

use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:step\s*\d+\s*[:.)-]|\(?\d{1,3}[.)]|\(?[a-z][.)]|[ivx]{1,4}[.)])\s+").unwrap()
});

const BULLETS: &[char] = &['•', '▪', '◦', '●', '○', '■', '-', '*', '–', '➢', '✓'];

/// Remove a leading bullet glyph or ordinal ("1.", "a)", "Step 2:") from list text
pub(crate) fn strip_list_marker(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix(BULLETS) {
        let rest = rest.trim_start();
        if !rest.is_empty() {
            return rest;
        }
    }

    if let Some(found) = ORDINAL_MARKER.find(trimmed) {
        let rest = trimmed[found.end()..].trim_start();
        if !rest.is_empty() {
            return rest;
        }
    }

    trimmed
}
