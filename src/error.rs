//! Error types for pdfseal
//!
//! Errors are split by the stage that raises them. Only [`ParseError`],
//! the pre-flight variants of [`BatchError`] and [`ArchiveError`] abort a
//! batch; [`EngineError`] is always captured into a per-document outcome.

use thiserror::Error;

use crate::pipeline::BatchResult;

/// The credential mapping produced no usable records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The mapping text was empty or contained only whitespace.
    #[error("empty mapping")]
    EmptyMapping,

    /// Every line or row of the mapping was malformed or incomplete.
    #[error("no valid records")]
    NoValidRecords,
}

/// The encryption engine rejected a document or failed internally.
///
/// `detail` is kept verbatim for the summary report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct EngineError {
    pub detail: String,
}

impl EngineError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Building the output archive failed.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Compression level {0} is out of range 0-9")]
    CompressionLevel(u8),
}

/// Errors that abort a whole batch submission.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Mapping error: {0}")]
    Parse(#[from] ParseError),

    #[error("No documents supplied")]
    NoDocuments,

    #[error("Batch of {count} documents exceeds the limit of {limit}")]
    TooManyDocuments { count: usize, limit: usize },

    /// Processing finished but the archive could not be built. The computed
    /// per-document outcomes are kept for diagnostics.
    #[error("Archive error: {source}")]
    Archive {
        #[source]
        source: ArchiveError,
        result: Box<BatchResult>,
    },
}
