//! In-memory BUD fixtures: docx-rs builds the document body, the zip writer
//! adds embedded workbooks and object anchors docx-rs cannot express.

#![allow(dead_code)]

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;

pub const WORKBOOK_PART: &str = "word/embeddings/Microsoft_Excel_Worksheet1.xlsx";
const WORKBOOK_RELATIONSHIP: &str = "rIdBudSheet1";

pub fn heading(text: &str, level: u8) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(&format!("Heading{level}"))
}

pub fn body(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

pub fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| {
                TableRow::new(
                    row.iter()
                        .map(|text| TableCell::new().add_paragraph(body(text)))
                        .collect(),
                )
            })
            .collect(),
    )
}

pub fn pack(docx: Docx) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).expect("pack docx");
    cursor.into_inner()
}

/// Copy a packed document, adding a workbook part. When `caption` is given,
/// an OLE object paragraph preceded by that caption is appended to the body
/// and linked to the workbook.
pub fn embed_workbook(docx_bytes: &[u8], workbook: &[u8], caption: Option<&str>) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx_bytes)).expect("read docx");
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let mut part = archive.by_index(index).expect("docx part");
        let name = part.name().to_string();
        let mut data = Vec::new();
        part.read_to_end(&mut data).expect("read part");

        if let Some(caption) = caption {
            if name == "word/document.xml" {
                data = add_object_paragraph(&String::from_utf8_lossy(&data), caption).into_bytes();
            } else if name == "word/_rels/document.xml.rels" {
                data = add_workbook_relationship(&String::from_utf8_lossy(&data)).into_bytes();
            }
        }

        writer
            .start_file(name, SimpleFileOptions::default())
            .expect("start part");
        writer.write_all(&data).expect("write part");
    }

    writer
        .start_file(WORKBOOK_PART, SimpleFileOptions::default())
        .expect("start workbook");
    writer.write_all(workbook).expect("write workbook");
    writer.finish().expect("finish docx").into_inner()
}

fn add_object_paragraph(document_xml: &str, caption: &str) -> String {
    let paragraphs = format!(
        r#"<w:p><w:r><w:t>{caption}</w:t></w:r></w:p><w:p><w:r><w:object><o:OLEObject xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" Type="Embed" ProgID="Excel.Sheet.12" ObjectID="_1" r:id="{WORKBOOK_RELATIONSHIP}"/></w:object></w:r></w:p>"#
    );
    match document_xml.find("<w:sectPr") {
        Some(position) => {
            let mut xml = document_xml.to_string();
            xml.insert_str(position, &paragraphs);
            xml
        }
        None => document_xml.replacen("</w:body>", &format!("{paragraphs}</w:body>"), 1),
    }
}

fn add_workbook_relationship(rels_xml: &str) -> String {
    let relationship = format!(
        r#"<Relationship Id="{WORKBOOK_RELATIONSHIP}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/package" Target="embeddings/Microsoft_Excel_Worksheet1.xlsx"/>"#
    );
    rels_xml.replacen("</Relationships>", &format!("{relationship}</Relationships>"), 1)
}

/// A minimal .xlsx with one worksheet per entry, cells as inline strings
pub fn workbook(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let mut put = |name: &str, content: String| {
        writer
            .start_file(name, SimpleFileOptions::default())
            .expect("start xlsx part");
        writer.write_all(content.as_bytes()).expect("write xlsx part");
    };

    let overrides: String = (1..=sheets.len())
        .map(|n| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    put(
        "[Content_Types].xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
{overrides}
</Types>"#
        ),
    );

    put(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
            .to_string(),
    );

    let sheet_entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            let n = i + 1;
            format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#)
        })
        .collect();
    put(
        "xl/workbook.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>{sheet_entries}</sheets>
</workbook>"#
        ),
    );

    let sheet_rels: String = (1..=sheets.len())
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            )
        })
        .collect();
    put(
        "xl/_rels/workbook.xml.rels",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{sheet_rels}
</Relationships>"#
        ),
    );

    for (i, (_, rows)) in sheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), worksheet_xml(rows));
    }

    writer.finish().expect("finish xlsx").into_inner()
}

fn worksheet_xml(rows: &[&[&str]]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        xml.push_str(&format!(r#"<row r="{row_number}">"#));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let column = (b'A' + c as u8) as char;
            xml.push_str(&format!(
                r#"<c r="{column}{row_number}" t="inlineStr"><is><t>{value}</t></is></c>"#
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}
