//! budparse: structured extraction from Business Understanding Documents
//!
//! This library reads a BUD `.docx` container and produces a normalized
//! model of it: form-field definitions, reference tables taken from embedded
//! workbooks, per-actor workflow steps and the section outline.

pub mod config;
pub mod document;
pub mod error;
pub mod extract;

// Re-export commonly used types
pub use config::ParserConfig;
pub use document::{
    parse_bytes, parse_document, ActionType, Actor, DocumentMetadata, FieldDefinition, FieldType,
    ParsedDocument, Section, TableData, TableSource, TableType, WorkflowStep, Workflows,
};
pub use error::{BudError, Result};
