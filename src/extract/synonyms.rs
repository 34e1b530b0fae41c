//! Field type synonym table
//!
//! Documents spell the same control type many ways ("Drop Down",
//! "Select", "LOV"). Every spelling is resolved here, once, to a
//! `FieldType`; later stages only ever see the enum.

use std::collections::HashMap;

use crate::config::ParserConfig;
use crate::document::FieldType;

const BUILTIN_SYNONYMS: &[(&str, FieldType)] = &[
    ("text", FieldType::Text),
    ("string", FieldType::Text),
    ("textbox", FieldType::Text),
    ("text box", FieldType::Text),
    ("text field", FieldType::Text),
    ("textarea", FieldType::Text),
    ("text area", FieldType::Text),
    ("free text", FieldType::Text),
    ("alphanumeric", FieldType::Text),
    ("input", FieldType::Text),
    ("dropdown", FieldType::Dropdown),
    ("drop down", FieldType::Dropdown),
    ("select", FieldType::Dropdown),
    ("single select", FieldType::Dropdown),
    ("picklist", FieldType::Dropdown),
    ("pick list", FieldType::Dropdown),
    ("list", FieldType::Dropdown),
    ("lov", FieldType::Dropdown),
    ("combo", FieldType::Dropdown),
    ("combobox", FieldType::Dropdown),
    ("radio", FieldType::Dropdown),
    ("radio button", FieldType::Dropdown),
    ("multi dropdown", FieldType::MultiDropdown),
    ("multi drop down", FieldType::MultiDropdown),
    ("multiselect", FieldType::MultiDropdown),
    ("multi select", FieldType::MultiDropdown),
    ("multiple select", FieldType::MultiDropdown),
    ("multi select dropdown", FieldType::MultiDropdown),
    ("date", FieldType::Date),
    ("datepicker", FieldType::Date),
    ("date picker", FieldType::Date),
    ("datetime", FieldType::Date),
    ("date time", FieldType::Date),
    ("calendar", FieldType::Date),
    ("file", FieldType::File),
    ("file upload", FieldType::File),
    ("upload", FieldType::File),
    ("attachment", FieldType::File),
    ("document", FieldType::File),
    ("mobile", FieldType::Mobile),
    ("mobile number", FieldType::Mobile),
    ("phone", FieldType::Mobile),
    ("phone number", FieldType::Mobile),
    ("contact number", FieldType::Mobile),
    ("email", FieldType::Email),
    ("email id", FieldType::Email),
    ("mail", FieldType::Email),
    ("number", FieldType::Number),
    ("numeric", FieldType::Number),
    ("integer", FieldType::Number),
    ("int", FieldType::Number),
    ("decimal", FieldType::Number),
    ("amount", FieldType::Number),
    ("currency", FieldType::Number),
    ("checkbox", FieldType::Checkbox),
    ("check box", FieldType::Checkbox),
    ("boolean", FieldType::Checkbox),
    ("toggle", FieldType::Checkbox),
    ("static checkbox", FieldType::StaticCheckbox),
    ("static check box", FieldType::StaticCheckbox),
    ("panel", FieldType::Panel),
    ("section", FieldType::Panel),
    ("group", FieldType::Panel),
    ("label", FieldType::Label),
    ("static text", FieldType::Label),
    ("display", FieldType::Label),
    ("heading", FieldType::Label),
    ("external dropdown", FieldType::ExternalDropdown),
    ("external drop down", FieldType::ExternalDropdown),
    ("external data", FieldType::ExternalDropdown),
    ("edv", FieldType::ExternalDropdown),
    ("edv dropdown", FieldType::ExternalDropdown),
    ("api dropdown", FieldType::ExternalDropdown),
];

/// Token → `FieldType` lookup, built once per parse
#[derive(Debug, Clone)]
pub struct TypeSynonyms {
    map: HashMap<String, FieldType>,
}

impl Default for TypeSynonyms {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeSynonyms {
    pub fn builtin() -> Self {
        let mut synonyms = Self {
            map: HashMap::new(),
        };
        for (token, field_type) in BUILTIN_SYNONYMS {
            synonyms.insert(token, *field_type);
        }
        synonyms
    }

    /// Built-in table with the configured extra tokens layered on top
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut synonyms = Self::builtin();
        for (token, field_type) in &config.type_synonyms {
            synonyms.insert(token, *field_type);
        }
        synonyms
    }

    fn insert(&mut self, token: &str, field_type: FieldType) {
        let key = normalize_token(token);
        self.map.insert(compact(&key), field_type);
        self.map.insert(key, field_type);
    }

    /// Resolve a type cell. Unmapped or empty tokens are `Unknown`, never an error.
    pub fn resolve(&self, token: &str) -> FieldType {
        let key = normalize_token(token);
        if key.is_empty() {
            return FieldType::Unknown;
        }

        if let Some(found) = self.lookup(&key) {
            return found;
        }

        // "Dropdown (single)", "Text, max 50"
        let head = key
            .split(['(', '[', ','])
            .next()
            .unwrap_or_default()
            .trim();
        if !head.is_empty() && head != key {
            if let Some(found) = self.lookup(head) {
                return found;
            }
        }

        FieldType::Unknown
    }

    fn lookup(&self, key: &str) -> Option<FieldType> {
        self.map
            .get(key)
            .or_else(|| self.map.get(&compact(key)))
            .copied()
    }
}

fn normalize_token(token: &str) -> String {
    token
        .to_lowercase()
        .replace(['_', '-', '/'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn compact(key: &str) -> String {
    key.chars().filter(|c| !c.is_whitespace()).collect()
}
