//! Reference tables from embedded spreadsheets
//!
//! Every embedded workbook part is written to a scoped temporary file, opened
//! with calamine and flattened sheet by sheet. A workbook or sheet that cannot
//! be read is skipped with a warning; it never fails the parse.

use std::io::Write;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::document::cleanup::is_blank_row;
use crate::document::container::ContainerReader;
use crate::document::parsing::embedded::EmbeddedAnchor;
use crate::document::{TableData, TableRows};
use crate::error::Result;

/// Tables of every sheet of every embedded workbook, in package then sheet order
pub fn extract_reference_tables(container: &ContainerReader) -> Result<Vec<TableData>> {
    let mut tables = Vec::new();

    for part in container.embedded_spreadsheets()? {
        let bytes = match container.read_binary_part(&part) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(part = %part, "skipping unreadable embedded spreadsheet: {e}");
                continue;
            }
        };

        match extract_workbook(&part, &bytes) {
            Ok(sheets) => tables.extend(sheets),
            Err(e) => warn!(part = %part, "skipping embedded spreadsheet: {e}"),
        }
    }

    debug!(tables = tables.len(), "extracted spreadsheet tables");
    Ok(tables)
}

/// Tables of one workbook. The temporary file lives only for this call.
fn extract_workbook(part: &str, bytes: &[u8]) -> anyhow::Result<Vec<TableData>> {
    let extension = Path::new(part)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("xlsx")
        .to_ascii_lowercase();

    let mut file = tempfile::Builder::new()
        .prefix("budparse-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    read_workbook(part, &file)
}

fn read_workbook(part: &str, file: &NamedTempFile) -> anyhow::Result<Vec<TableData>> {
    let mut workbook = open_workbook_auto(file.path())?;
    let mut tables = Vec::new();

    for sheet_name in workbook.sheet_names() {
        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => {
                let (headers, rows) = range_to_table(&range);
                debug!(part = %part, sheet = %sheet_name, rows = rows.len(), "read sheet");
                tables.push(TableData::from_sheet(part, &sheet_name, headers, rows));
            }
            Err(e) => warn!(part = %part, sheet = %sheet_name, "skipping unreadable sheet: {e}"),
        }
    }

    Ok(tables)
}

/// First non-blank row is the header; blank rows are dropped
fn range_to_table(range: &Range<Data>) -> (Vec<String>, TableRows) {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row| !is_blank_row(row));

    let headers = rows.next().unwrap_or_default();
    (headers, rows.collect())
}

/// Displayed value of a cell; formulas come through as their cached result
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        _ => cell.to_string(),
    }
}

/// Attach the citation found next to each embedded object to its sheets
pub(crate) fn link_citations(tables: &mut [TableData], anchors: &[EmbeddedAnchor]) {
    for anchor in anchors {
        let Some(citation) = &anchor.citation else {
            continue;
        };
        for table in tables
            .iter_mut()
            .filter(|t| t.source_file.as_deref() == Some(anchor.part.as_str()))
        {
            if table.citation.is_none() {
                table.citation = Some(citation.clone());
            }
        }
    }
}
