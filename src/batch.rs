//! Batch submission
//!
//! The one-call entry point: parse the mapping if needed, run the pre-flight
//! checks, drive the pipeline and package the archive.

use crate::aggregator::ProgressSnapshot;
use crate::archive::{self, ArchiveOptions};
use crate::document::InputDocument;
use crate::engine::EncryptionEngine;
use crate::error::{BatchError, ParseError};
use crate::mapping::{CredentialTable, MappingFormat, parse_mapping};
use crate::pipeline::{BatchResult, CancellationToken, DEFAULT_CONCURRENCY, Pipeline, PipelineOptions};

/// Largest batch accepted unless configured otherwise.
pub const DEFAULT_MAX_DOCUMENTS: usize = 100;

/// Credentials for a batch, either already parsed or as raw text.
#[derive(Debug, Clone)]
pub enum MappingInput {
    Table(CredentialTable),
    Text { text: String, format: MappingFormat },
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub mapping: MappingInput,
    pub documents: Vec<InputDocument>,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub max_documents: usize,
    pub archive: ArchiveOptions,
    pub cancel: CancellationToken,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_documents: DEFAULT_MAX_DOCUMENTS,
            archive: ArchiveOptions::default(),
            cancel: CancellationToken::new(),
        }
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    pub result: BatchResult,
    pub archive: Vec<u8>,
}

/// Run a whole batch.
///
/// Fails before any document is touched when the mapping is unusable, no
/// documents were supplied, or the batch exceeds `max_documents`. Fails
/// after processing only when the archive cannot be built, in which case the
/// computed result travels inside the error.
pub fn submit<E, P>(
    request: BatchRequest,
    engine: &E,
    options: &BatchOptions,
    progress: P,
) -> Result<BatchOutput, BatchError>
where
    E: EncryptionEngine + ?Sized,
    P: FnMut(&ProgressSnapshot),
{
    let BatchRequest { mapping, documents } = request;

    let table = match mapping {
        MappingInput::Table(table) if table.is_empty() => {
            return Err(ParseError::EmptyMapping.into());
        }
        MappingInput::Table(table) => table,
        MappingInput::Text { text, format } => parse_mapping(&text, format)?,
    };

    if documents.is_empty() {
        return Err(BatchError::NoDocuments);
    }
    if documents.len() > options.max_documents {
        return Err(BatchError::TooManyDocuments {
            count: documents.len(),
            limit: options.max_documents,
        });
    }

    let pipeline = Pipeline::new(
        &table,
        engine,
        PipelineOptions {
            concurrency: options.concurrency,
            cancel: options.cancel.clone(),
        },
    );
    let result = pipeline.run(documents, progress);

    match archive::assemble(&result, &options.archive) {
        Ok(archive) => Ok(BatchOutput { result, archive }),
        Err(source) => Err(BatchError::Archive {
            source,
            result: Box::new(result),
        }),
    }
}
