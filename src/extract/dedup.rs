//! Field deduplication
//!
//! The same logical field is usually defined once per actor view. Candidates
//! whose names normalize to the same key are folded left to right, in
//! document order, with a pure `merge_fields`.

use std::collections::HashMap;

use tracing::debug;

use crate::document::cleanup::{append_distinct, normalize_name};
use crate::document::FieldDefinition;

pub const LOGIC_SEPARATOR: &str = "\n• ";
pub const CONDITION_SEPARATOR: &str = " | ";

/// Combine two records of the same logical field; `a` was encountered first
pub fn merge_fields(a: &FieldDefinition, b: &FieldDefinition) -> FieldDefinition {
    let mut merged = a.clone();

    if !merged.field_type.is_known() && b.field_type.is_known() {
        merged.field_type = b.field_type;
        merged.raw_type = b.raw_type.clone();
    } else if merged.raw_type.is_empty() {
        merged.raw_type = b.raw_type.clone();
    }

    merged.is_mandatory = a.is_mandatory || b.is_mandatory;

    append_distinct(&mut merged.logic, &b.logic, LOGIC_SEPARATOR);
    append_distinct(
        &mut merged.visibility_condition,
        &b.visibility_condition,
        CONDITION_SEPARATOR,
    );
    append_distinct(&mut merged.validation, &b.validation, CONDITION_SEPARATOR);

    union_into(&mut merged.dropdown_values, &b.dropdown_values);
    union_into(&mut merged.actors, &b.actors);
    union_into(&mut merged.referenced_tables, &b.referenced_tables);

    if merged.panel.is_empty() {
        merged.panel = b.panel.clone();
    }
    if merged.default_value.is_empty() {
        merged.default_value = b.default_value.clone();
    }

    merged
}

fn union_into<T: PartialEq + Clone>(acc: &mut Vec<T>, incoming: &[T]) {
    for item in incoming {
        if !acc.contains(item) {
            acc.push(item.clone());
        }
    }
}

/// One canonical record per normalized name, in first-encounter order
pub fn deduplicate(candidates: Vec<FieldDefinition>) -> Vec<FieldDefinition> {
    let candidate_count = candidates.len();
    let mut merged: Vec<FieldDefinition> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let key = normalize_name(&candidate.name);
        match positions.get(&key) {
            Some(&position) => {
                debug!(field = %candidate.name, "merging duplicate field definition");
                merged[position] = merge_fields(&merged[position], &candidate);
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(candidate);
            }
        }
    }

    debug!(
        candidates = candidate_count,
        fields = merged.len(),
        "deduplicated field definitions"
    );
    merged
}
