mod common;

use budparse::{parse_bytes, BudError, ParserConfig, TableSource, TableType};
use common::{embed_workbook, heading, pack, table, workbook, WORKBOOK_PART};
use docx_rs::Docx;

fn base_document() -> Vec<u8> {
    pack(
        Docx::new()
            .add_paragraph(heading("Initiator Fields", 1))
            .add_table(table(&[
                &["Field Name", "Field Type", "Mandatory", "Logic"],
                &["State", "Dropdown", "Yes", "Values as per table 1.3"],
            ])),
    )
}

#[cfg(test)]
mod spreadsheet_tests {
    use super::*;

    #[test]
    fn test_every_sheet_is_emitted_including_empty_ones() {
        let states: &[&[&str]] = &[&["State", "Code"], &["", ""], &["Karnataka", "29"], &["Goa", "30"]];
        let empty: &[&[&str]] = &[];
        let banks: &[&[&str]] = &[&["Bank"], &["Canara"]];
        let book = workbook(&[("States", states), ("Empty", empty), ("Banks", banks)]);
        let bytes = embed_workbook(&base_document(), &book, None);

        let document = parse_bytes(bytes, "bud.docx", &ParserConfig::default())
            .expect("document with embedded workbook parses");

        let sheets: Vec<_> = document
            .reference_tables()
            .iter()
            .filter(|t| t.source == TableSource::Excel)
            .collect();
        assert_eq!(sheets.len(), 3);

        assert_eq!(sheets[0].sheet_name.as_deref(), Some("States"));
        assert_eq!(sheets[0].source_file.as_deref(), Some(WORKBOOK_PART));
        assert_eq!(sheets[0].headers, vec!["State", "Code"]);
        assert_eq!(sheets[0].rows.len(), 2, "blank row is skipped");
        assert_eq!(sheets[0].row_count, Some(2));
        assert_eq!(sheets[0].column_count, Some(2));
        assert_eq!(sheets[0].table_type, TableType::Reference);

        assert_eq!(sheets[1].sheet_name.as_deref(), Some("Empty"));
        assert!(sheets[1].rows.is_empty());
        assert_eq!(sheets[1].row_count, Some(0));

        assert_eq!(sheets[2].rows, vec![vec!["Canara".to_string()]]);
        assert_eq!(document.metadata().embedded_spreadsheet_count, 1);
    }

    #[test]
    fn test_corrupt_workbook_is_skipped() {
        let bytes = embed_workbook(&base_document(), b"definitely not a workbook", None);

        let document = parse_bytes(bytes, "bud.docx", &ParserConfig::default())
            .expect("corrupt workbook is not fatal");
        assert!(document.reference_tables().is_empty());
        assert_eq!(document.fields().len(), 1);
        assert_eq!(document.metadata().embedded_spreadsheet_count, 1);
    }

    #[test]
    fn test_caption_links_sheet_to_citing_field() {
        let states: &[&[&str]] = &[&["State", "Code"], &["Goa", "30"]];
        let book = workbook(&[("States", states)]);
        let bytes = embed_workbook(&base_document(), &book, Some("Table 1.3: State codes"));

        let document = parse_bytes(bytes, "bud.docx", &ParserConfig::default()).unwrap();
        let sheet = document.table_by_citation("1.3").expect("sheet linked to its caption");
        assert_eq!(sheet.sheet_name.as_deref(), Some("States"));

        let state = document.field_by_variable_name("__state__").unwrap();
        assert_eq!(state.referenced_tables, vec!["1.3"]);
        assert_eq!(document.tables_cited_by(state).len(), 1);
    }

    #[test]
    fn test_workbook_instead_of_document_is_fatal() {
        let rows: &[&[&str]] = &[&["A"]];
        let book = workbook(&[("Sheet1", rows)]);
        let err = parse_bytes(book, "book.docx", &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, BudError::InvalidContainer(_)));
    }
}
