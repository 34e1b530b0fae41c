//! Document container access and validation
//!
//! A .docx file is a ZIP package of XML parts. This module validates the
//! package, hands out raw parts and lists the spreadsheets embedded under
//! `word/embeddings/`. It carries no business logic.

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{BudError, Result};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

static SPREADSHEET_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^word/embeddings/[^/]+\.(xlsx|xlsm|xlsb|xls)$").unwrap());

/// Document-level properties from `docProps/core.xml`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

pub struct ContainerReader {
    file_name: String,
    bytes: Vec<u8>,
}

impl ContainerReader {
    /// Open and validate a document container from disk
    pub fn open(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if matches!(extension.as_str(), "xlsx" | "xlsm" | "xls" | "csv") {
            return Err(BudError::InvalidContainer(format!(
                "Invalid file format. Expected a Word document, got .{extension}"
            )));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document.docx")
            .to_string();

        Self::from_bytes(bytes, file_name)
    }

    /// Validate an in-memory container
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        validate_package(&bytes, &file_name)?;
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The whole package, for readers that want to open it themselves
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn archive(&self) -> Result<ZipArchive<Cursor<&[u8]>>> {
        Ok(ZipArchive::new(Cursor::new(self.bytes.as_slice()))?)
    }

    pub fn part_names(&self) -> Result<Vec<String>> {
        let archive = self.archive()?;
        Ok(archive.file_names().map(str::to_string).collect())
    }

    /// Read an XML part as text, `None` when the part does not exist
    pub fn read_xml_part(&self, name: &str) -> Result<Option<String>> {
        let mut archive = self.archive()?;
        let mut part = match archive.by_name(name) {
            Ok(part) => part,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(Some(xml))
    }

    pub fn read_binary_part(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive()?;
        let mut part = archive.by_name(name)?;
        let mut data = Vec::with_capacity(part.size() as usize);
        part.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Names of embedded spreadsheet parts, in package order
    pub fn embedded_spreadsheets(&self) -> Result<Vec<String>> {
        let parts: Vec<String> = self
            .part_names()?
            .into_iter()
            .filter(|name| SPREADSHEET_PART.is_match(name))
            .collect();
        debug!(count = parts.len(), "embedded spreadsheet parts");
        Ok(parts)
    }

    /// Relationship id → part name for `word/document.xml`
    pub fn document_relationships(&self) -> Result<HashMap<String, String>> {
        let Some(xml) = self.read_xml_part(DOCUMENT_RELS_PART)? else {
            return Ok(HashMap::new());
        };
        Ok(parse_relationships(&xml, "word"))
    }

    pub fn core_properties(&self) -> Result<CoreProperties> {
        let Some(xml) = self.read_xml_part(CORE_PROPERTIES_PART)? else {
            return Ok(CoreProperties::default());
        };
        Ok(parse_core_properties(&xml))
    }
}

/// Check the package is a word-processing container
fn validate_package(bytes: &[u8], file_name: &str) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        BudError::InvalidContainer(format!("{file_name} is not a document container: {e}"))
    })?;

    if archive.by_name(DOCUMENT_PART).is_err() {
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(BudError::InvalidContainer(format!(
                "{file_name} appears to be an Excel workbook, not a Word document"
            )));
        }
        return Err(BudError::InvalidContainer(format!(
            "Invalid .docx file: missing {DOCUMENT_PART} in {file_name}"
        )));
    }

    Ok(())
}

/// Parse a relationships part, resolving targets against `base_dir`
pub(crate) fn parse_relationships(xml: &str, base_dir: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                let mut external = false;
                for a in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&a.value).to_string();
                    match a.key.local_name().as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value == "External",
                        _ => {}
                    }
                }
                if let (Some(id), Some(target), false) = (id, target, external) {
                    relationships.insert(id, resolve_target(base_dir, &target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("stopped reading relationships: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    relationships
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

pub(crate) fn parse_core_properties(xml: &str) -> CoreProperties {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut properties = CoreProperties::default();
    let mut current: Option<Vec<u8>> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                current = Some(e.local_name().as_ref().to_vec());
            }
            Ok(Event::Text(ref e)) => {
                if let Some(name) = current.as_deref() {
                    let text = e.unescape().unwrap_or_default().trim().to_string();
                    assign_core_property(&mut properties, name, text);
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("stopped reading core properties: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    properties
}

fn assign_core_property(properties: &mut CoreProperties, name: &[u8], text: String) {
    if text.is_empty() {
        return;
    }
    match name {
        b"title" => properties.title = Some(text),
        b"creator" => properties.creator = Some(text),
        b"lastModifiedBy" => properties.last_modified_by = Some(text),
        b"created" => properties.created = Some(text),
        b"modified" => properties.modified = Some(text),
        _ => {}
    }
}
