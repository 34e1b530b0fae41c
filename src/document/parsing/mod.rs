//! Document parsing utilities
//!
//! This module contains specialized parsing functions for different
//! document elements: text, headings, tables, sections, list markers,
//! table citations and embedded object anchors.

pub(crate) mod citation;
pub(crate) mod embedded;
pub(crate) mod heading;
pub(crate) mod list;
pub(crate) mod sections;
pub(crate) mod table;
pub(crate) mod text;
