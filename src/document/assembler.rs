//! Final composition of a parse
//!
//! The assembler only checks the field-uniqueness invariant. Two fields with
//! the same normalized name mean deduplication is broken, so the parse aborts.

use std::collections::HashMap;

use tracing::{info, warn};

use super::cleanup::normalize_name;
use super::models::*;
use crate::error::{BudError, Result};

pub fn assemble(
    fields: Vec<FieldDefinition>,
    tables: Vec<TableData>,
    sections: Vec<Section>,
    workflows: Workflows,
    metadata: DocumentMetadata,
) -> Result<ParsedDocument> {
    check_unique_fields(&fields)?;

    let document = ParsedDocument {
        all_fields: fields,
        reference_tables: tables,
        workflows,
        sections,
        metadata,
    };

    info!(
        fields = document.all_fields.len(),
        reference_tables = document.reference_tables.len(),
        sections = document.sections.len(),
        workflow_steps = document.workflow_step_count(),
        "assembled document"
    );
    Ok(document)
}

fn check_unique_fields(fields: &[FieldDefinition]) -> Result<()> {
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut by_variable: HashMap<&str, usize> = HashMap::new();

    for (index, field) in fields.iter().enumerate() {
        if let Some(&first) = by_name.get(&normalize_name(&field.name)) {
            return Err(BudError::DuplicateField {
                name: field.name.clone(),
                first,
                second: index,
            });
        }
        by_name.insert(normalize_name(&field.name), index);

        // "PAN No" and "PAN-No" are different fields sharing an identifier
        if let Some(&first) = by_variable.get(field.variable_name.as_str()) {
            warn!(
                variable_name = %field.variable_name,
                first = %fields[first].name,
                second = %field.name,
                "distinct fields share a variable name"
            );
        } else {
            by_variable.insert(&field.variable_name, index);
        }
    }

    Ok(())
}

impl ParsedDocument {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Load a serialized document, re-checking field uniqueness
    pub fn from_json(json: &str) -> Result<Self> {
        let document: ParsedDocument = serde_json::from_str(json)?;
        check_unique_fields(&document.all_fields)?;
        Ok(document)
    }
}
