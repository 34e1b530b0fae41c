//! Field table rows → raw field definitions
//!
//! One candidate per non-blank row. Candidates are not unique yet: the same
//! field usually appears once per actor view and is merged later.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::document::cleanup::{clean_text, is_blank_row, normalize_name};
use crate::document::parsing::citation::extract_citations;
use crate::document::parsing::list::strip_list_marker;
use crate::document::{FieldDefinition, FieldType};

use super::classifier::FieldTable;
use super::synonyms::TypeSynonyms;

static INLINE_VALUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:values?|options?)\s*(?:(?:are|is|will\s+be|includes?)\b|:|=|\s-\s)\s*:?\s*([^\n]+)",
    )
    .unwrap()
});

const VALUE_SEPARATORS: &[char] = &['/', ',', ';', '|'];

/// Mandatory flag from a free-text cell.
///
/// The whole cell must be one of yes, y, mandatory, true or 1 (any case,
/// a trailing full stop allowed); anything else, including an empty cell,
/// is not mandatory.
pub fn parse_boolean_token(token: &str) -> bool {
    let token = token.trim().trim_end_matches('.').trim_end().to_lowercase();
    matches!(token.as_str(), "yes" | "y" | "mandatory" | "true" | "1")
}

/// Dropdown values stated inline in logic text ("Values are A/B/C")
pub fn extract_inline_dropdown_values(logic: &str) -> Vec<String> {
    for captures in INLINE_VALUES.captures_iter(logic) {
        let Some(list) = captures.get(1) else {
            continue;
        };
        // The list ends with its sentence
        let list = list.as_str().split(". ").next().unwrap_or_default();
        let values = split_values(list, VALUE_SEPARATORS);
        if values.len() >= 2 {
            return values;
        }
    }
    Vec::new()
}

fn split_values(text: &str, separators: &[char]) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for item in text.split(separators) {
        let item = strip_list_marker(item)
            .trim()
            .trim_end_matches('.')
            .trim_matches(|c| c == '"' || c == '\'' || c == '“' || c == '”')
            .trim();
        if !item.is_empty() && !values.iter().any(|v| v == item) {
            values.push(item.to_string());
        }
    }
    values
}

pub struct FieldTableParser<'a> {
    synonyms: &'a TypeSynonyms,
}

impl<'a> FieldTableParser<'a> {
    pub fn new(synonyms: &'a TypeSynonyms) -> Self {
        Self { synonyms }
    }

    /// One candidate per usable row, in row order
    pub fn parse_rows(&self, table: &FieldTable) -> Vec<FieldDefinition> {
        let layout = &table.layout;
        let header_key: Vec<String> = table.headers.iter().map(|h| normalize_name(h)).collect();
        let mut current_panel: Option<String> = None;
        let mut fields = Vec::new();

        for (offset, row) in table.rows.iter().enumerate() {
            let row_index = table.header_rows + offset;

            if is_blank_row(row) {
                debug!(table_index = table.table_index, row_index, "skipping blank row");
                continue;
            }

            // Header rows repeated across page breaks
            let row_key: Vec<String> = row.iter().map(|c| normalize_name(c)).collect();
            if row_key == header_key {
                debug!(table_index = table.table_index, row_index, "skipping repeated header row");
                continue;
            }

            let cell = |column: Option<usize>| -> String {
                column
                    .and_then(|index| row.get(index))
                    .map(|text| clean_text(text))
                    .unwrap_or_default()
            };

            let name = cell(Some(layout.name));
            if name.is_empty() {
                debug!(
                    section = %table.section_heading,
                    table_index = table.table_index,
                    row_index,
                    "skipping row without a field name"
                );
                continue;
            }

            let mut field = FieldDefinition::new(&name);
            field.raw_type = cell(Some(layout.field_type));
            field.field_type = self.synonyms.resolve(&field.raw_type);
            field.is_mandatory = parse_boolean_token(&cell(layout.mandatory));
            field.logic = cell(layout.logic);
            field.visibility_condition = cell(layout.visibility);
            field.validation = cell(layout.validation);
            field.default_value = cell(layout.default_value);

            let explicit_panel = cell(layout.panel);
            field.panel = if !explicit_panel.is_empty() {
                explicit_panel
            } else if field.field_type == FieldType::Panel {
                current_panel = Some(field.name.clone());
                field.name.clone()
            } else {
                current_panel
                    .clone()
                    .unwrap_or_else(|| table.section_heading.clone())
            };

            let mut values = split_values(&cell(layout.dropdown_values), &['/', ',', ';', '|', '\n']);
            for value in extract_inline_dropdown_values(&field.logic) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            field.dropdown_values = values;

            field.referenced_tables = extract_citations(&field.logic);
            field.actors = table.actor.into_iter().collect();

            if !field.field_type.is_known() {
                debug!(
                    section = %table.section_heading,
                    table_index = table.table_index,
                    row_index,
                    raw_type = %field.raw_type,
                    "unrecognized field type"
                );
            }

            fields.push(field);
        }

        fields
    }
}
