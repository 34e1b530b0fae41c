//! Document parsing and data structures module
//!
//! This module reads a BUD container, walks its body into sections and
//! assembles the extracted fields, tables and workflows into a
//! `ParsedDocument`.

pub(crate) mod assembler;
pub mod cleanup;
pub mod container;
pub mod loader;
pub mod models;
pub(crate) mod parsing;
pub mod query;

pub use assembler::assemble;
pub use container::{ContainerReader, CoreProperties};
pub use loader::{parse_bytes, parse_document};
pub use models::*;
