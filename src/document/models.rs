//! Core data structures for the normalized document model
//!
//! This module defines every public type produced by a parse: sections,
//! raw tables, field definitions, reference tables, workflow steps and the
//! `ParsedDocument` aggregate handed to downstream consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::cleanup::derive_variable_name;

pub type TableRows = Vec<Vec<String>>;

/// Workflow steps keyed by the actor performing them
pub type Workflows = BTreeMap<Actor, Vec<WorkflowStep>>;

/// Actor a field table or narrative section was written for, if any
pub type ActorHint = Option<Actor>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub heading: String,
    /// Manual heading number stripped from the heading text ("4.2.1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub level: u8,
    pub parent_path: String,
    pub content: Vec<String>,
    #[serde(skip)]
    pub raw_tables: Vec<RawTable>,
}

impl Section {
    pub(crate) fn new(heading: String, number: Option<String>, level: u8, parent_path: String) -> Self {
        Self {
            heading,
            number,
            level,
            parent_path,
            content: Vec::new(),
            raw_tables: Vec::new(),
        }
    }
}

/// A table exactly as it appears in the document, before classification
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: TableRows,
    /// Index of the containing section in `ParsedDocument::sections`
    pub section: usize,
    /// Position of this table among all tables of the document
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Dropdown,
    MultiDropdown,
    Date,
    File,
    Mobile,
    Email,
    Number,
    Checkbox,
    StaticCheckbox,
    Panel,
    Label,
    ExternalDropdown,
    #[default]
    Unknown,
}

impl FieldType {
    pub fn is_known(self) -> bool {
        self != FieldType::Unknown
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Initiator,
    SecondaryParty,
    Approver,
}

impl Actor {
    /// Fixed priority used to break ties between keyword sets
    pub const PRIORITY: [Actor; 3] = [Actor::Initiator, Actor::SecondaryParty, Actor::Approver];
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Actor::Initiator => "initiator",
            Actor::SecondaryParty => "secondary_party",
            Actor::Approver => "approver",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub raw_type: String,
    pub is_mandatory: bool,
    pub logic: String,
    pub dropdown_values: Vec<String>,
    pub visibility_condition: String,
    pub validation: String,
    #[serde(alias = "section")]
    pub panel: String,
    #[serde(default)]
    pub default_value: String,
    pub variable_name: String,
    /// Actor views the field was defined in
    #[serde(default)]
    pub actors: Vec<Actor>,
    /// Table citations ("1.3") mentioned by the field logic
    #[serde(default)]
    pub referenced_tables: Vec<String>,
}

impl FieldDefinition {
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_string();
        let variable_name = derive_variable_name(&name);
        Self {
            name,
            variable_name,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TableSource {
    Word,
    Excel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    FieldDefinitions,
    Reference,
    VersionHistory,
    Terminology,
    DocumentRequirements,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: TableRows,
    pub source: TableSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    pub table_type: TableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    /// Normalized citation ("1.3") the document uses to refer to this table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// Heading of the section a Word table was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl TableData {
    pub fn from_word(table: &RawTable, table_type: TableType, section: &Section) -> Self {
        Self {
            headers: table.headers.clone(),
            rows: table.rows.clone(),
            source: TableSource::Word,
            source_file: None,
            sheet_name: None,
            table_type,
            row_count: None,
            column_count: None,
            citation: None,
            section: Some(section.heading.clone()),
        }
    }

    pub fn from_sheet(source_file: &str, sheet_name: &str, headers: Vec<String>, rows: TableRows) -> Self {
        let column_count = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        Self {
            row_count: Some(rows.len()),
            column_count: Some(column_count),
            headers,
            rows,
            source: TableSource::Excel,
            source_file: Some(source_file.to_string()),
            sheet_name: Some(sheet_name.to_string()),
            table_type: TableType::Reference,
            citation: None,
            section: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Login,
    Create,
    Validate,
    Approve,
    Notify,
    Submit,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowStep {
    pub actor: Actor,
    pub order: u32,
    pub text: String,
    pub action_type: ActionType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    pub section_count: usize,
    pub field_count: usize,
    pub embedded_spreadsheet_count: usize,
}

/// The normalized model of one parsed document.
///
/// Built once by the assembler and never mutated afterwards; downstream
/// consumers only get read access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedDocument {
    #[serde(rename = "fields")]
    pub(crate) all_fields: Vec<FieldDefinition>,
    pub(crate) reference_tables: Vec<TableData>,
    pub(crate) workflows: Workflows,
    pub(crate) sections: Vec<Section>,
    pub(crate) metadata: DocumentMetadata,
}

impl ParsedDocument {
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.all_fields
    }

    pub fn reference_tables(&self) -> &[TableData] {
        &self.reference_tables
    }

    pub fn workflows(&self) -> &Workflows {
        &self.workflows
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn workflow_step_count(&self) -> usize {
        self.workflows.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineItem {
    pub title: String,
    pub level: u8,
    pub section_index: usize,
}
