//! Error types for document parsing
//!
//! Only fatal conditions surface here. Tables, sheets and sections that
//! cannot be interpreted are logged and skipped by the stage that meets them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BudError>;

#[derive(Debug, Error)]
pub enum BudError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read document container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("cannot parse word document: {0}")]
    Docx(#[from] docx_rs::ReaderError),

    #[error("{0}")]
    InvalidContainer(String),

    #[error("invalid parser configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two merged fields share a normalized name. Deduplication guarantees
    /// this never happens, so hitting it is a logic defect.
    #[error("duplicate field after deduplication: {name:?} (entries {first} and {second})")]
    DuplicateField {
        name: String,
        first: usize,
        second: usize,
    },
}
