//! Read-only lookups on a parsed document
//!
//! These are the access paths downstream consumers use: address a field by
//! its variable name, list a panel, search logic text and follow table
//! citations to the reference data they point at.

use super::cleanup::normalize_name;
use super::models::*;

impl ParsedDocument {
    pub fn field_by_variable_name(&self, variable_name: &str) -> Option<&FieldDefinition> {
        self.all_fields
            .iter()
            .find(|field| field.variable_name == variable_name)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDefinition> {
        let key = normalize_name(name);
        self.all_fields
            .iter()
            .find(|field| normalize_name(&field.name) == key)
    }

    /// Fields of one panel, case-insensitive on the panel name
    pub fn fields_in_panel(&self, panel: &str) -> Vec<&FieldDefinition> {
        let key = normalize_name(panel);
        self.all_fields
            .iter()
            .filter(|field| normalize_name(&field.panel) == key)
            .collect()
    }

    /// Case-insensitive search over field names and logic
    pub fn search_fields(&self, query: &str) -> Vec<&FieldDefinition> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        self.all_fields
            .iter()
            .filter(|field| {
                field.name.to_lowercase().contains(&query_lower)
                    || field.logic.to_lowercase().contains(&query_lower)
            })
            .collect()
    }

    pub fn table_by_citation(&self, citation: &str) -> Option<&TableData> {
        self.reference_tables
            .iter()
            .find(|table| table.citation.as_deref() == Some(citation))
    }

    /// Reference tables cited by a field's logic
    pub fn tables_cited_by(&self, field: &FieldDefinition) -> Vec<&TableData> {
        self.reference_tables
            .iter()
            .filter(|table| {
                table
                    .citation
                    .as_ref()
                    .is_some_and(|citation| field.referenced_tables.contains(citation))
            })
            .collect()
    }

    /// Fields whose logic cites `citation`
    pub fn fields_citing(&self, citation: &str) -> Vec<&FieldDefinition> {
        self.all_fields
            .iter()
            .filter(|field| field.referenced_tables.iter().any(|c| c == citation))
            .collect()
    }

    pub fn outline(&self) -> Vec<OutlineItem> {
        let mut outline = Vec::new();

        for (index, section) in self.sections.iter().enumerate() {
            if section.heading.is_empty() {
                continue;
            }
            let title = if let Some(number) = &section.number {
                format!("{number} {}", section.heading)
            } else {
                section.heading.clone()
            };
            outline.push(OutlineItem {
                title,
                level: section.level,
                section_index: index,
            });
        }

        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, panel: &str, logic: &str, cites: &[&str]) -> FieldDefinition {
        let mut field = FieldDefinition::new(name);
        field.panel = panel.to_string();
        field.logic = logic.to_string();
        field.referenced_tables = cites.iter().map(|c| c.to_string()).collect();
        field
    }

    fn document() -> ParsedDocument {
        let mut states = TableData::from_sheet(
            "word/embeddings/a.xlsx",
            "States",
            vec!["State".to_string()],
            Vec::new(),
        );
        states.citation = Some("1.3".to_string());
        let banks = TableData::from_sheet("word/embeddings/b.xlsx", "Banks", Vec::new(), Vec::new());

        ParsedDocument {
            all_fields: vec![
                field("Vendor Name", "Basic Details", "", &[]),
                field("State", "Address", "Values from table 1.3", &["1.3"]),
                field("PIN Code", "address", "Derived from State", &[]),
            ],
            reference_tables: vec![states, banks],
            workflows: Workflows::new(),
            sections: vec![
                Section::new(String::new(), None, 1, String::new()),
                Section::new("Scope".to_string(), Some("1".to_string()), 1, String::new()),
                Section::new("Fields".to_string(), None, 2, "Scope".to_string()),
            ],
            metadata: DocumentMetadata::default(),
        }
    }

    #[test]
    fn test_field_lookups() {
        let document = document();
        assert_eq!(
            document.field_by_variable_name("__pin_code__").map(|f| f.name.as_str()),
            Some("PIN Code")
        );
        assert!(document.field_by_variable_name("__pin__").is_none());
        assert_eq!(
            document.field_by_name("  vendor  NAME").map(|f| f.panel.as_str()),
            Some("Basic Details")
        );
        assert_eq!(document.fields_in_panel("ADDRESS").len(), 2);
    }

    #[test]
    fn test_search_fields() {
        let document = document();
        let names: Vec<&str> = document
            .search_fields("state")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["State", "PIN Code"]);
        assert!(document.search_fields("  ").is_empty());
    }

    #[test]
    fn test_citations() {
        let document = document();
        assert_eq!(
            document.table_by_citation("1.3").and_then(|t| t.sheet_name.as_deref()),
            Some("States")
        );
        assert!(document.table_by_citation("2").is_none());

        let state = document.field_by_name("State").unwrap();
        assert_eq!(document.tables_cited_by(state).len(), 1);
        assert_eq!(document.fields_citing("1.3").len(), 1);
    }

    #[test]
    fn test_outline_skips_unnamed_section() {
        let outline = document().outline();
        let titles: Vec<&str> = outline.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["1 Scope", "Fields"]);
        assert_eq!(outline[1].section_index, 2);
        assert_eq!(outline[1].level, 2);
    }
}
