//! Extraction stages
//!
//! Each stage consumes the output of the previous one and returns new values;
//! nothing here mutates shared state.

pub mod classifier;
pub mod dedup;
pub mod field_table;
pub mod reference;
pub mod synonyms;
pub mod workflow;

pub use classifier::{reference_table_kind, ColumnLayout, FieldTable, TableClassifier};
pub use dedup::{deduplicate, merge_fields};
pub use field_table::{parse_boolean_token, FieldTableParser};
pub use reference::extract_reference_tables;
pub use synonyms::TypeSynonyms;
pub use workflow::{classify_action, extract_workflows};
