//! Raw table extraction
//!
//! Converts a docx-rs table into header and row text. Horizontally merged
//! cells are repeated once per grid column they span and vertically merged
//! continuation cells repeat the text above them, so every row lines up with
//! the header grid the way the document renders it.

use super::text::extract_cell_text;

/// Header cells and data rows of a table, `None` when the table has no rows
pub(crate) fn extract_table_rows(table: &docx_rs::Table) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut grid: Vec<Vec<String>> = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut row_cells = Vec::new();

        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let layout = cell_layout(cell);
            let column = row_cells.len();

            let text = if layout.continues_vertical_merge {
                grid.last()
                    .and_then(|above| above.get(column))
                    .cloned()
                    .unwrap_or_default()
            } else {
                extract_cell_text(cell)
            };

            for _ in 0..layout.span {
                row_cells.push(text.clone());
            }
        }

        if !row_cells.is_empty() {
            grid.push(row_cells);
        }
    }

    if grid.is_empty() {
        return None;
    }

    let headers = grid.remove(0);
    Some((headers, grid))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CellLayout {
    span: usize,
    continues_vertical_merge: bool,
}

/// Read gridSpan/vMerge from the cell properties.
///
/// docx-rs keeps these fields private, so they are read back through the
/// serialized form of the property block.
fn cell_layout(cell: &docx_rs::TableCell) -> CellLayout {
    let mut layout = CellLayout {
        span: 1,
        continues_vertical_merge: false,
    };

    let Ok(value) = serde_json::to_value(&cell.property) else {
        return layout;
    };

    if let Some(span) = value.get("gridSpan").and_then(json_number) {
        layout.span = span.clamp(1, 64);
    }

    if let Some(merge) = value.get("verticalMerge") {
        let merge = merge.to_string().to_lowercase();
        layout.continues_vertical_merge = merge.contains("continue");
    }

    layout
}

fn json_number(value: &serde_json::Value) -> Option<usize> {
    value
        .as_u64()
        .or_else(|| value.get("val").and_then(serde_json::Value::as_u64))
        .map(|n| n as usize)
}
