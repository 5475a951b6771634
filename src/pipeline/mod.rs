//! Concurrent encryption pipeline
//!
//! Documents go through a FIFO queue served by a fixed number of workers.
//! Each document ends in exactly one [`Outcome`]:
//!
//! ```text
//! Queued ──no credential──▶ Skipped
//! Queued ──credential──▶ Encrypting ──ok──▶ Encrypted
//!                                   └─err─▶ Failed
//! ```
//!
//! Nothing is retried. Outcomes are aggregated on the calling thread in
//! completion order, and the progress callback runs once per document
//! right after it is recorded.

use crate::aggregator::{Aggregator, ProgressSnapshot};
use crate::document::InputDocument;
use crate::engine::EncryptionEngine;
use crate::mapping::CredentialTable;
use crate::matcher::match_credential;
use crate::parallel::WorkerPool;

mod cancel;
mod outcome;

pub use cancel::CancellationToken;
pub use outcome::{BatchResult, CANCELLED, NO_CREDENTIAL, Outcome, OutcomeKind, OutcomeStatus};

/// Concurrent encryptions when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Largest accepted `batch.concurrency`.
pub const MAX_CONCURRENCY: usize = 256;

/// Share of CPU cores used when concurrency is set to 0 (auto).
const AUTO_THREAD_PERCENTAGE: u8 = 75;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum engine calls in flight; 0 sizes the pool from the CPU count
    pub concurrency: usize,
    pub cancel: CancellationToken,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
        }
    }
}

impl PipelineOptions {
    /// Worker count after resolving auto sizing.
    pub fn workers(&self) -> usize {
        match self.concurrency {
            0 => WorkerPool::auto_workers(0, AUTO_THREAD_PERCENTAGE),
            n => n,
        }
    }
}

pub struct Pipeline<'a, E: EncryptionEngine + ?Sized> {
    table: &'a CredentialTable,
    engine: &'a E,
    options: PipelineOptions,
}

impl<'a, E: EncryptionEngine + ?Sized> Pipeline<'a, E> {
    pub fn new(table: &'a CredentialTable, engine: &'a E, options: PipelineOptions) -> Self {
        Self {
            table,
            engine,
            options,
        }
    }

    /// Process every document and return once all workers are joined.
    pub fn run<P>(&self, documents: Vec<InputDocument>, mut progress: P) -> BatchResult
    where
        P: FnMut(&ProgressSnapshot),
    {
        let total = documents.len();
        let pool = WorkerPool::new(self.options.workers());
        tracing::info!(
            "Processing {} documents with up to {} workers",
            total,
            pool.workers().min(total.max(1))
        );

        let mut aggregator = Aggregator::new(total);
        let items: Vec<(usize, InputDocument)> = documents.into_iter().enumerate().collect();

        pool.run(
            items,
            |(position, document), worker_id| self.process(position, document, worker_id),
            |outcome| {
                tracing::debug!("{}", outcome);
                let snapshot = aggregator.record(outcome);
                progress(&snapshot);
            },
        );

        let cancelled = self.options.cancel.is_cancelled();
        let result = aggregator.finish(cancelled);
        tracing::info!(
            "Batch finished: {} ok, {} skipped, {} failed{}",
            result.ok,
            result.skipped,
            result.failed,
            if cancelled { " (cancelled)" } else { "" }
        );
        result
    }

    fn process(&self, position: usize, document: InputDocument, worker_id: usize) -> Outcome {
        let kind = self.classify(&document, worker_id);
        Outcome {
            position,
            document,
            kind,
        }
    }

    fn classify(&self, document: &InputDocument, worker_id: usize) -> OutcomeKind {
        let Some(record) = match_credential(self.table, document.name()) else {
            return OutcomeKind::Skipped;
        };

        if self.options.cancel.is_cancelled() {
            return OutcomeKind::Failed {
                detail: CANCELLED.to_string(),
            };
        }

        let bytes = match document.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                return OutcomeKind::Failed {
                    detail: format!("Failed to read {}: {}", document.name(), e),
                };
            }
        };

        tracing::trace!("Worker {} encrypting {}", worker_id, document.name());
        match self.engine.encrypt_document(&bytes, &record.password) {
            Ok(produced) => OutcomeKind::Encrypted { produced },
            Err(e) => OutcomeKind::Failed { detail: e.detail },
        }
    }
}
