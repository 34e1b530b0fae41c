//! Plain-text extraction from docx-rs elements
//!
//! Layout and run formatting are dropped; only the text a reader would see
//! survives, with tabs and breaks kept as whitespace.

use super::super::cleanup::clean_text;

/// Extract plain text from a paragraph, handling various child elements
pub(crate) fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_paragraph_children(&para.children, &mut text);
    text.trim().to_string()
}

fn push_paragraph_children(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                text.push_str(&extract_run_text(run));
            }
            docx_rs::ParagraphChild::Insert(insert) => {
                // Tracked insertions are part of the visible text
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        text.push_str(&extract_run_text(run));
                    }
                }
            }
            docx_rs::ParagraphChild::Hyperlink(link) => {
                push_paragraph_children(&link.children, text);
            }
            docx_rs::ParagraphChild::Delete(_) => {
                // Tracked deletions are not part of the visible text
            }
            _ => {}
        }
    }
}

/// Extract text from a run
pub(crate) fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => {
                text.push_str(&text_elem.text);
            }
            docx_rs::RunChild::Tab(_) => {
                text.push('\t');
            }
            docx_rs::RunChild::Break(_) => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text
}

/// True when every run carrying text is bold
pub(crate) fn is_bold_paragraph(para: &docx_rs::Paragraph) -> bool {
    let mut saw_text = false;
    for child in &para.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            if extract_run_text(run).trim().is_empty() {
                continue;
            }
            saw_text = true;
            if run.run_property.bold.is_none() {
                return false;
            }
        }
    }
    saw_text
}

/// Text of a table cell, one line per paragraph
pub(crate) fn extract_cell_text(cell: &docx_rs::TableCell) -> String {
    let mut lines = Vec::new();

    for content in &cell.children {
        if let docx_rs::TableCellContent::Paragraph(para) = content {
            let line = extract_paragraph_text(para);
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    clean_text(&lines.join("\n"))
}
