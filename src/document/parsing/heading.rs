//! Heading detection and classification
//!
//! Headings come from Word paragraph styles first. Documents that number
//! their headings by hand in bold body text are caught by a conservative
//! text fallback. Manual numbers are split off the heading text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{extract_paragraph_text, is_bold_paragraph};

/// Deepest heading level kept; deeper headings are clamped to it
pub(crate) const MAX_HEADING_LEVEL: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeadingInfo {
    pub(crate) level: u8,
    pub(crate) number: Option<String>,
    pub(crate) text: String,
}

// Manual heading numbers, most common first
static HEADING_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "1.", "1.1", "2.1.1"; single numbers need a period so "Heading 1" style titles survive
        Regex::new(r"^(\d+(?:\.\d+)+\.?|\d+\.)\s+(.+)$").unwrap(),
        // "Section 1.2", "Chapter 3"
        Regex::new(r"^((?:Section|Chapter|Part)\s+\d+(?:\.\d+)*\.?)\s+(.+)$").unwrap(),
        Regex::new(r"^([A-Z]\.)\s+(.+)$").unwrap(),
        Regex::new(r"^([IVX]+\.)\s+(.+)$").unwrap(),
    ]
});

static HIERARCHICAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)\.?\s+(\S.*)$").unwrap());

/// Split a manual number off heading text: "4.2 Initiator Fields" → ("4.2", "Initiator Fields")
pub(crate) fn split_heading_number(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for pattern in HEADING_NUMBER_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let (Some(number_match), Some(text_match)) = (captures.get(1), captures.get(2)) {
                let number = number_match.as_str().trim_end_matches('.');
                let remaining_text = text_match.as_str().trim();

                if !number.is_empty() && !remaining_text.is_empty() {
                    return Some((number.to_string(), remaining_text.to_string()));
                }
            }
        }
    }

    None
}

/// Detect heading level from Word paragraph style
pub(crate) fn detect_heading_from_paragraph_style(para: &docx_rs::Paragraph) -> Option<u8> {
    let style = para.property.style.as_ref()?;
    let val = style.val.to_lowercase();

    if val == "title" {
        return Some(1);
    }
    if let Some(suffix) = val.strip_prefix("heading") {
        let level = suffix
            .trim()
            .parse::<u8>()
            .unwrap_or(1)
            .clamp(1, MAX_HEADING_LEVEL);
        return Some(level);
    }

    None
}

/// Bold, short, hierarchically numbered text such as "3.2 Approver Actions"
fn detect_numbered_heading(text: &str) -> Option<(u8, String, String)> {
    if text.len() > 80 || text.contains('\n') || text.ends_with('.') || text.ends_with(':') {
        return None;
    }

    let captures = HIERARCHICAL_NUMBER.captures(text)?;
    let number = captures.get(1)?.as_str().to_string();
    let rest = captures.get(2)?.as_str().trim().to_string();
    let depth = number.split('.').count().min(MAX_HEADING_LEVEL as usize) as u8;

    Some((depth, number, rest))
}

/// Heading information for a paragraph, `None` for body text
pub(crate) fn detect_heading(para: &docx_rs::Paragraph) -> Option<HeadingInfo> {
    let text = extract_paragraph_text(para);
    if text.is_empty() {
        return None;
    }

    if let Some(level) = detect_heading_from_paragraph_style(para) {
        let (number, text) = match split_heading_number(&text) {
            Some((number, rest)) => (Some(number), rest),
            None => (None, text),
        };
        return Some(HeadingInfo { level, number, text });
    }

    if is_bold_paragraph(para) {
        if let Some((level, number, text)) = detect_numbered_heading(&text) {
            return Some(HeadingInfo {
                level,
                number: Some(number),
                text,
            });
        }
    }

    None
}
