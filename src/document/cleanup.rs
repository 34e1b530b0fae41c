//! Text normalization helpers
//!
//! Shared by every stage that compares or keys on document text: field
//! identity, variable names and cell cleanup.

/// Identity key for a field name: trimmed, lowercased, inner whitespace collapsed
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable identifier downstream consumers use to address a field.
///
/// Lowercases the name, collapses every run of non-alphanumeric characters
/// into a single underscore and wraps the result in `__`.
pub fn derive_variable_name(name: &str) -> String {
    let mut body = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !body.is_empty() {
                body.push('_');
            }
            pending_separator = false;
            body.push(c);
        } else {
            pending_separator = true;
        }
    }

    format!("__{body}__")
}

/// Clean a table cell or paragraph: non-breaking spaces become spaces,
/// each line is trimmed and blank lines are dropped.
pub(crate) fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Append `incoming` to `acc` behind `separator` unless `acc` already holds
/// it as a run of whole segments. An empty `acc` takes `incoming` verbatim.
/// `incoming` is never split, so it always survives as a substring.
/// Returns true when something was appended.
pub(crate) fn append_distinct(acc: &mut String, incoming: &str, separator: &str) -> bool {
    if incoming.trim().is_empty() {
        return false;
    }
    if acc.trim().is_empty() {
        *acc = incoming.to_string();
        return true;
    }

    let existing: Vec<&str> = acc.split(separator).collect();
    let segments: Vec<&str> = incoming.split(separator).collect();
    if existing.windows(segments.len()).any(|run| run == segments.as_slice()) {
        return false;
    }

    acc.push_str(separator);
    acc.push_str(incoming);
    true
}
