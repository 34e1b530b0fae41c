//! Table classification
//!
//! Decides whether a raw Word table defines form fields, and for which actor
//! view. Field tables have no fixed schema, so columns are located through
//! synonym lists and an ordered set of matching strategies, and the guess is
//! confirmed by sampling the type column against the type synonym table.

use tracing::{debug, info, trace};

use crate::config::{ColumnSynonyms, ParserConfig};
use crate::document::cleanup::is_blank_row;
use crate::document::{ActorHint, RawTable, Section, TableRows, TableType};

use super::synonyms::TypeSynonyms;

/// Decides whether a lowercased header cell matches a lowercased synonym
pub type ColumnMatcher = fn(header: &str, synonym: &str) -> bool;

/// Matching strategies in priority order; the first strategy that finds a
/// column wins
pub const COLUMN_MATCHERS: &[(&str, ColumnMatcher)] = &[
    ("exact", match_exact),
    ("contains", match_contains),
    ("token", match_tokens),
];

fn match_exact(header: &str, synonym: &str) -> bool {
    header == synonym
}

fn match_contains(header: &str, synonym: &str) -> bool {
    header.contains(synonym)
}

/// Word-level match that survives punctuation: "Data-Type" matches both
/// "data type" and "datatype"
fn match_tokens(header: &str, synonym: &str) -> bool {
    let header_tokens = tokens(header);
    let synonym_tokens = tokens(synonym);
    if synonym_tokens.is_empty() {
        return false;
    }
    synonym_tokens.iter().all(|t| header_tokens.contains(t))
        || header_tokens.concat() == synonym_tokens.concat()
}

fn tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Locate the column for one role, skipping columns already claimed by
/// another role
pub fn find_column(headers: &[String], synonyms: &[String], claimed: &[usize]) -> Option<usize> {
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let synonyms: Vec<String> = synonyms.iter().map(|s| normalize_header(s)).collect();

    for (strategy, matcher) in COLUMN_MATCHERS {
        for synonym in synonyms.iter().filter(|s| !s.is_empty()) {
            let hit = headers
                .iter()
                .enumerate()
                .find(|(index, header)| !claimed.contains(index) && matcher(header, synonym));
            if let Some((index, header)) = hit {
                trace!(strategy, synonym = %synonym, header = %header, "matched column");
                return Some(index);
            }
        }
    }

    None
}

/// Column positions of a field-definition table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    pub name: usize,
    pub field_type: usize,
    pub mandatory: Option<usize>,
    pub logic: Option<usize>,
    pub dropdown_values: Option<usize>,
    pub visibility: Option<usize>,
    pub validation: Option<usize>,
    pub panel: Option<usize>,
    pub default_value: Option<usize>,
}

impl ColumnLayout {
    /// Resolve every role. Type is located before name, so a header cell
    /// matching both ("Field Type") is the type column.
    pub fn detect(headers: &[String], columns: &ColumnSynonyms) -> Option<Self> {
        let field_type = find_column(headers, &columns.type_, &[])?;
        let name = find_column(headers, &columns.name, &[field_type])?;

        let mut claimed = vec![field_type, name];
        let mut optional = |synonyms: &[String]| {
            let found = find_column(headers, synonyms, &claimed);
            if let Some(index) = found {
                claimed.push(index);
            }
            found
        };

        let mandatory = optional(&columns.mandatory);
        let default_value = optional(&columns.default_value);
        let dropdown_values = optional(&columns.dropdown_values);
        let visibility = optional(&columns.visibility);
        let validation = optional(&columns.validation);
        let panel = optional(&columns.panel);
        let logic = optional(&columns.logic);

        Some(Self {
            name,
            field_type,
            mandatory,
            logic,
            dropdown_values,
            visibility,
            validation,
            panel,
            default_value,
        })
    }
}

/// A table confirmed to define fields, with its header window settled
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTable {
    pub headers: Vec<String>,
    pub rows: TableRows,
    /// Rows of the raw table consumed as header (1 normally, 2 after a merged title row)
    pub header_rows: usize,
    pub layout: ColumnLayout,
    pub actor: ActorHint,
    pub section_heading: String,
    pub table_index: usize,
}

pub struct TableClassifier<'a> {
    config: &'a ParserConfig,
    synonyms: &'a TypeSynonyms,
}

impl<'a> TableClassifier<'a> {
    pub fn new(config: &'a ParserConfig, synonyms: &'a TypeSynonyms) -> Self {
        Self { config, synonyms }
    }

    /// Kind and actor of a table; `None` leaves the table unclassified
    pub fn classify(&self, table: &RawTable, section: &Section) -> Option<(TableType, ActorHint)> {
        self.detect_field_table(table, section)
            .map(|field_table| (TableType::FieldDefinitions, field_table.actor))
    }

    pub fn detect_field_table(&self, table: &RawTable, section: &Section) -> Option<FieldTable> {
        let (headers, rows, merged_title) = settle_header(table);

        let Some(layout) = ColumnLayout::detect(&headers, &self.config.columns) else {
            debug!(
                section = %section.heading,
                table_index = table.index,
                "no name/type columns, not a field table"
            );
            return None;
        };

        if !self.type_column_is_valid(&rows, layout.field_type) {
            info!(
                section = %section.heading,
                table_index = table.index,
                "type column mostly unrecognized, not a field table"
            );
            return None;
        }

        let actor = self.actor_hint(section, merged_title.as_deref());
        debug!(
            section = %section.heading,
            table_index = table.index,
            actor = ?actor,
            "field definition table"
        );

        Some(FieldTable {
            header_rows: if merged_title.is_some() { 2 } else { 1 },
            headers,
            rows,
            layout,
            actor,
            section_heading: section.heading.clone(),
            table_index: table.index,
        })
    }

    fn type_column_is_valid(&self, rows: &TableRows, type_column: usize) -> bool {
        let thresholds = &self.config.classification;
        let sampled: Vec<&Vec<String>> = rows
            .iter()
            .filter(|row| !is_blank_row(row))
            .take(thresholds.sample_rows)
            .collect();

        if sampled.is_empty() {
            return false;
        }

        let valid = sampled
            .iter()
            .filter(|row| {
                row.get(type_column)
                    .is_some_and(|cell| self.synonyms.resolve(cell).is_known())
            })
            .count();

        valid as f64 / sampled.len() as f64 >= thresholds.min_valid_ratio
    }

    /// Heading first, then a merged title row, then the parent path
    fn actor_hint(&self, section: &Section, merged_title: Option<&str>) -> ActorHint {
        let actors = &self.config.actors;
        actors
            .match_actor(&section.heading)
            .or_else(|| merged_title.and_then(|title| actors.match_actor(title)))
            .or_else(|| actors.match_actor(&section.parent_path))
    }
}

/// Shift the header window past a merged title row.
///
/// When every header cell carries the same text (a title merged across the
/// table), the first data row is the real header.
fn settle_header(table: &RawTable) -> (Vec<String>, TableRows, Option<String>) {
    let headers = &table.headers;
    let is_merged_title = headers.len() > 1
        && headers.iter().all(|cell| cell.trim() == headers[0].trim())
        && !table.rows.is_empty();

    if is_merged_title {
        let mut rows = table.rows.clone();
        let real_header = rows.remove(0);
        (real_header, rows, Some(headers[0].trim().to_string()))
    } else {
        (headers.clone(), table.rows.clone(), None)
    }
}

/// Header-based kind of a table that does not define fields; tables with no
/// recognizable header stay `Unknown`
pub fn reference_table_kind(headers: &[String]) -> TableType {
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let any = |words: &[&str]| headers.iter().any(|h| words.iter().any(|w| h.contains(w)));

    if headers.iter().all(String::is_empty) {
        TableType::Unknown
    } else if any(&["version", "revision"]) && any(&["date", "author", "change", "modified"]) {
        TableType::VersionHistory
    } else if any(&["term", "abbreviation", "acronym"])
        && any(&["definition", "meaning", "description", "full form"])
    {
        TableType::Terminology
    } else if any(&["document"]) && any(&["mandatory", "required", "format", "type"]) {
        TableType::DocumentRequirements
    } else if any(&["reference", "code", "lookup", "master"]) && headers.len() > 1 {
        TableType::Reference
    } else {
        TableType::Unknown
    }
}
