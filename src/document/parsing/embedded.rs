//! Embedded object anchors
//!
//! Spreadsheets are embedded as OLE objects inside paragraphs. docx-rs does
//! not surface them, so `word/document.xml` is scanned directly for
//! `o:OLEObject` elements. The nearest paragraph text around each object is
//! kept so its citation ("Table 1.3") can be attached to the sheet data.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::debug;

use super::citation::first_citation;

/// How many preceding paragraphs are searched for a caption
const CAPTION_LOOKBEHIND: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EmbeddedAnchor {
    /// Package part the object points at ("word/embeddings/...xlsx")
    pub(crate) part: String,
    pub(crate) citation: Option<String>,
}

/// Find embedded objects and the citation nearest to each.
///
/// `relationships` maps relationship ids of `document.xml` to part names.
pub(crate) fn scan_embedded_anchors(
    document_xml: &str,
    relationships: &HashMap<String, String>,
) -> Vec<EmbeddedAnchor> {
    let mut reader = Reader::from_str(document_xml);
    reader.config_mut().trim_text(false);

    let mut anchors = Vec::new();
    let mut recent_paragraphs: Vec<String> = Vec::new();
    let mut current_text = String::new();
    let mut pending_ids: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:p" => {
                current_text.clear();
                pending_ids.clear();
            }
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => {
                in_text = true;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => {
                in_text = false;
            }
            Ok(Event::Text(ref e)) if in_text => {
                current_text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"OLEObject" =>
            {
                for a in e.attributes().flatten() {
                    if a.key.local_name().as_ref() == b"id" {
                        pending_ids.push(String::from_utf8_lossy(&a.value).to_string());
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:p" => {
                let paragraph = current_text.trim().to_string();
                for id in pending_ids.drain(..) {
                    let Some(part) = relationships.get(&id) else {
                        debug!(relationship = %id, "embedded object without a relationship target");
                        continue;
                    };
                    anchors.push(EmbeddedAnchor {
                        part: part.clone(),
                        citation: nearest_citation(&paragraph, &recent_paragraphs),
                    });
                }
                if !paragraph.is_empty() {
                    recent_paragraphs.push(paragraph);
                    if recent_paragraphs.len() > CAPTION_LOOKBEHIND {
                        recent_paragraphs.remove(0);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("stopped scanning for embedded objects: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    anchors
}

fn nearest_citation(paragraph: &str, recent: &[String]) -> Option<String> {
    first_citation(paragraph).or_else(|| recent.iter().rev().find_map(|text| first_citation(text)))
}
