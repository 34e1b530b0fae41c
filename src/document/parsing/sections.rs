//! Section walking
//!
//! Flattens the body of a Word document into an ordered list of sections.
//! Each section owns the paragraphs and tables that follow its heading up to
//! the next heading, and remembers the headings above it as a parent path.

use tracing::debug;

use super::super::cleanup::clean_text;
use super::super::models::{RawTable, Section};
use super::heading::detect_heading;
use super::table::extract_table_rows;
use super::text::extract_paragraph_text;

pub(crate) const PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Default)]
pub(crate) struct SectionWalker {
    sections: Vec<Section>,
    /// (level, heading) of the open ancestors of the current section
    ancestors: Vec<(u8, String)>,
    table_count: usize,
}

impl SectionWalker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Walk a whole document body
    pub(crate) fn walk(mut self, document: &docx_rs::Document) -> Vec<Section> {
        for child in &document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(para) => self.visit_paragraph(para),
                docx_rs::DocumentChild::Table(table) => self.visit_table(table),
                _ => {
                    // Tables of contents, section breaks and bookmarks carry no content
                }
            }
        }

        debug!(
            sections = self.sections.len(),
            tables = self.table_count,
            "walked document body"
        );
        self.sections
    }

    fn visit_paragraph(&mut self, para: &docx_rs::Paragraph) {
        if let Some(heading) = detect_heading(para) {
            self.open_section(heading.level, heading.text, heading.number);
            return;
        }

        let text = clean_text(&extract_paragraph_text(para));
        if !text.is_empty() {
            self.current_section().content.push(text);
        }
    }

    fn visit_table(&mut self, table: &docx_rs::Table) {
        let Some((headers, rows)) = extract_table_rows(table) else {
            debug!(table_index = self.table_count, "skipping table without rows");
            self.table_count += 1;
            return;
        };

        let index = self.table_count;
        self.table_count += 1;
        self.current_section();
        let section = self.sections.len() - 1;

        self.sections[section].raw_tables.push(RawTable {
            headers,
            rows,
            section,
            index,
        });
    }

    fn open_section(&mut self, level: u8, heading: String, number: Option<String>) {
        while self
            .ancestors
            .last()
            .is_some_and(|(ancestor_level, _)| *ancestor_level >= level)
        {
            self.ancestors.pop();
        }

        let parent_path = self
            .ancestors
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR);

        self.ancestors.push((level, heading.clone()));
        self.sections
            .push(Section::new(heading, number, level, parent_path));
    }

    /// The section content is currently flowing into; content before the
    /// first heading opens an unnamed level-1 section
    fn current_section(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections
                .push(Section::new(String::new(), None, 1, String::new()));
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

    fn heading(text: &str, level: u8) -> Paragraph {
        Paragraph::new()
            .add_run(Run::new().add_text(text))
            .style(&format!("Heading{level}"))
    }

    fn body(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn one_cell_table(text: &str) -> Table {
        Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(body(text)),
        ])])
    }

    #[test]
    fn test_walk_builds_parent_paths() {
        let docx = Docx::new()
            .add_paragraph(body("Intro text before any heading"))
            .add_paragraph(heading("1. Vendor Onboarding", 1))
            .add_paragraph(heading("1.1 Initiator Behaviour", 2))
            .add_paragraph(body("Initiator logs in."))
            .add_paragraph(body("   "))
            .add_table(one_cell_table("Field Name"))
            .add_paragraph(heading("1.1.1 Details", 3))
            .add_paragraph(heading("1.2 Approver Behaviour", 2))
            .add_paragraph(body("Approver approves."));

        let sections = SectionWalker::new().walk(&docx.document);
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["", "Vendor Onboarding", "Initiator Behaviour", "Details", "Approver Behaviour"]
        );

        assert_eq!(sections[0].content, vec!["Intro text before any heading"]);
        assert_eq!(sections[2].parent_path, "Vendor Onboarding");
        assert_eq!(sections[2].number.as_deref(), Some("1.1"));
        assert_eq!(sections[2].content, vec!["Initiator logs in."]);
        assert_eq!(sections[2].raw_tables.len(), 1);
        assert_eq!(sections[2].raw_tables[0].section, 2);
        assert_eq!(sections[3].parent_path, "Vendor Onboarding > Initiator Behaviour");
        assert_eq!(sections[4].parent_path, "Vendor Onboarding");
        assert_eq!(sections[4].level, 2);
    }

    #[test]
    fn test_table_before_heading_opens_unnamed_section() {
        let docx = Docx::new()
            .add_table(one_cell_table("Version"))
            .add_paragraph(heading("Scope", 1));
        let sections = SectionWalker::new().walk(&docx.document);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "");
        assert_eq!(sections[0].raw_tables[0].index, 0);
    }
}
