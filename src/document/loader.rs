//! Document loading and orchestration
//!
//! `parse_document()` runs the whole pipeline for one file: container
//! validation, section walking, table classification, field parsing and
//! deduplication, spreadsheet extraction, workflow extraction and assembly.
//! Every stage is synchronous and works on the previous stage's output.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use super::assembler::assemble;
use super::container::{ContainerReader, DOCUMENT_PART};
use super::models::*;
use super::parsing::citation::first_citation;
use super::parsing::embedded::scan_embedded_anchors;
use super::parsing::sections::SectionWalker;
use crate::config::ParserConfig;
use crate::error::Result;
use crate::extract::reference::{extract_reference_tables, link_citations};
use crate::extract::{
    deduplicate, extract_workflows, reference_table_kind, FieldTableParser, TableClassifier,
    TypeSynonyms,
};

/// Parse a document from disk
pub fn parse_document(file_path: &Path, config: &ParserConfig) -> Result<ParsedDocument> {
    info!(file = %file_path.display(), "parsing document");
    let container = ContainerReader::open(file_path)?;
    parse_container(&container, config)
}

/// Parse an in-memory document; `file_name` is used for metadata and messages
pub fn parse_bytes(bytes: Vec<u8>, file_name: &str, config: &ParserConfig) -> Result<ParsedDocument> {
    info!(file = %file_name, "parsing document");
    let container = ContainerReader::from_bytes(bytes, file_name)?;
    parse_container(&container, config)
}

fn parse_container(container: &ContainerReader, config: &ParserConfig) -> Result<ParsedDocument> {
    let docx = docx_rs::read_docx(container.bytes())?;
    let sections = SectionWalker::new().walk(&docx.document);

    let WordTables {
        candidates,
        mut tables,
        field_table_sections,
    } = extract_word_tables(&sections, config);
    let fields = deduplicate(candidates);

    tables.extend(extract_spreadsheet_tables(container)?);

    let workflows = extract_workflows(&sections, &field_table_sections, config);
    let metadata = build_metadata(container, &sections, &fields)?;

    assemble(fields, tables, sections, workflows, metadata)
}

struct WordTables {
    candidates: Vec<FieldDefinition>,
    tables: Vec<TableData>,
    /// Indices of sections holding at least one field table
    field_table_sections: HashSet<usize>,
}

/// Field candidates from field tables, and every other table as reference data
fn extract_word_tables(sections: &[Section], config: &ParserConfig) -> WordTables {
    let synonyms = TypeSynonyms::from_config(config);
    let classifier = TableClassifier::new(config, &synonyms);
    let parser = FieldTableParser::new(&synonyms);

    let mut candidates = Vec::new();
    let mut tables = Vec::new();
    let mut field_table_sections = HashSet::new();

    for (section_index, section) in sections.iter().enumerate() {
        // Captions usually precede the table they name
        let citation = section
            .content
            .iter()
            .rev()
            .find_map(|paragraph| first_citation(paragraph));

        for raw in &section.raw_tables {
            if let Some(field_table) = classifier.detect_field_table(raw, section) {
                let rows = parser.parse_rows(&field_table);
                debug!(
                    section = %section.heading,
                    table_index = raw.index,
                    candidates = rows.len(),
                    "parsed field table"
                );
                candidates.extend(rows);
                field_table_sections.insert(section_index);
                continue;
            }

            let table_type = reference_table_kind(&raw.headers);
            info!(
                section = %section.heading,
                table_index = raw.index,
                table_type = ?table_type,
                "keeping non-field table"
            );
            let mut table = TableData::from_word(raw, table_type, section);
            table.citation = citation.clone();
            tables.push(table);
        }
    }

    WordTables {
        candidates,
        tables,
        field_table_sections,
    }
}

fn extract_spreadsheet_tables(container: &ContainerReader) -> Result<Vec<TableData>> {
    let mut tables = extract_reference_tables(container)?;
    if tables.is_empty() {
        return Ok(tables);
    }

    if let Some(document_xml) = container.read_xml_part(DOCUMENT_PART)? {
        let relationships = container.document_relationships()?;
        let anchors = scan_embedded_anchors(&document_xml, &relationships);
        link_citations(&mut tables, &anchors);
    }

    Ok(tables)
}

fn build_metadata(
    container: &ContainerReader,
    sections: &[Section],
    fields: &[FieldDefinition],
) -> Result<DocumentMetadata> {
    let properties = container.core_properties()?;

    let title = properties
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| {
            Path::new(container.file_name())
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Untitled Document")
                .to_string()
        });

    Ok(DocumentMetadata {
        title,
        author: properties.creator,
        last_modified_by: properties.last_modified_by,
        created: properties.created,
        modified: properties.modified,
        file_name: container.file_name().to_string(),
        file_size: container.file_size(),
        section_count: sections.len(),
        field_count: fields.len(),
        embedded_spreadsheet_count: container.embedded_spreadsheets()?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    }

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            rows.iter()
                .map(|row| TableRow::new(row.iter().map(|text| cell(text)).collect()))
                .collect(),
        )
    }

    fn heading(text: &str, level: u8) -> Paragraph {
        Paragraph::new()
            .add_run(Run::new().add_text(text))
            .style(&format!("Heading{level}"))
    }

    fn body(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_word_tables_are_split_by_kind() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(heading("Version History", 1))
                .add_table(table(&[&["Version", "Date", "Author"], &["1.0", "01-01-2024", "A"]]))
                .add_paragraph(heading("Initiator Fields", 1))
                .add_paragraph(body("Codes are listed in Table 4"))
                .add_table(table(&[
                    &["Field Name", "Field Type", "Mandatory"],
                    &["PAN", "Text", "Yes"],
                ]))
                .add_table(table(&[&["State", "Code"], &["Goa", "30"]])),
        );

        let document = parse_bytes(bytes, "onboarding.docx", &ParserConfig::default()).unwrap();
        assert_eq!(document.fields().len(), 1);
        assert_eq!(document.fields()[0].panel, "Initiator Fields");

        let tables = document.reference_tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table_type, TableType::VersionHistory);
        assert_eq!(tables[0].source, TableSource::Word);
        assert_eq!(tables[0].citation, None);
        assert_eq!(tables[1].table_type, TableType::Reference);
        assert_eq!(tables[1].citation.as_deref(), Some("4"));
        assert_eq!(tables[1].section.as_deref(), Some("Initiator Fields"));

        let metadata = document.metadata();
        assert_eq!(metadata.title, "onboarding");
        assert_eq!(metadata.file_name, "onboarding.docx");
        assert_eq!(metadata.section_count, 2);
        assert_eq!(metadata.field_count, 1);
        assert_eq!(metadata.embedded_spreadsheet_count, 0);
        assert!(metadata.file_size > 0);
    }

    #[test]
    fn test_rejects_non_container() {
        let err = parse_bytes(b"plain text".to_vec(), "notes.docx", &ParserConfig::default());
        assert!(matches!(err, Err(crate::error::BudError::InvalidContainer(_))));
    }
}
