//! # pdfseal
//!
//! Batch-encrypts PDF documents, each with a password looked up from a
//! credential mapping, and packages the results into one zip archive with a
//! per-file report.
//!
//! ## Pipeline
//!
//! ```text
//! mapping text ─▶ mapping ─▶ CredentialTable ─┐
//!                                             ├─▶ pipeline ─▶ aggregator ─▶ archive
//! documents ─────────────────▶ matcher ───────┘   (engine)
//! ```
//!
//! - [`mapping`] parses loosely structured tabular or pasted input
//! - [`matcher`] pairs documents with credentials
//! - [`pipeline`] runs the engine on a bounded worker pool
//! - [`aggregator`] keeps consistent progress counts
//! - [`archive`] writes the zip and the summary report
//! - [`batch`] ties the steps together behind one call
//!
//! ## Quick Start
//!
//! ```bash
//! # See which documents have a credential
//! pdfseal preview --mapping passwords.csv ./pdfs
//!
//! # Encrypt them into an archive
//! pdfseal encrypt --mapping passwords.csv ./pdfs -o sealed.zip
//! ```

pub mod aggregator;
pub mod archive;
pub mod batch;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod parallel;
pub mod pipeline;

pub use batch::{BatchOptions, BatchOutput, BatchRequest, MappingInput, submit};
pub use cli::{Cli, Output};
pub use config::PdfsealConfig;
pub use document::InputDocument;
pub use engine::{EncryptionEngine, QpdfEngine};
pub use error::{ArchiveError, BatchError, EngineError, ParseError};
pub use mapping::{CredentialRecord, CredentialTable, MappingFormat, parse_mapping};
pub use pipeline::{BatchResult, CancellationToken, Outcome, OutcomeKind};

/// Result type alias for pdfseal CLI operations
pub type Result<T> = anyhow::Result<T>;
