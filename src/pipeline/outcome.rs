use std::fmt;

use serde::Serialize;

use crate::aggregator::ProgressSnapshot;
use crate::document::InputDocument;

/// Detail recorded for documents without a credential.
pub const NO_CREDENTIAL: &str = "no credential";

/// Detail recorded for documents left unprocessed after cancellation.
pub const CANCELLED: &str = "batch cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Encrypted { produced: Vec<u8> },
    Skipped,
    Failed { detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeStatus {
    Ok,
    Skipped,
    Failed,
}

impl OutcomeStatus {
    /// Label used in logs and the summary report.
    pub fn label(self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "OK",
            OutcomeStatus::Skipped => "SKIP",
            OutcomeStatus::Failed => "ERR",
        }
    }
}

/// Terminal result for one document.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Index of the document in the submitted order
    pub position: usize,
    pub document: InputDocument,
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn name(&self) -> &str {
        self.document.name()
    }

    pub fn status(&self) -> OutcomeStatus {
        match self.kind {
            OutcomeKind::Encrypted { .. } => OutcomeStatus::Ok,
            OutcomeKind::Skipped => OutcomeStatus::Skipped,
            OutcomeKind::Failed { .. } => OutcomeStatus::Failed,
        }
    }

    /// Reason shown next to the status; empty for encrypted documents.
    pub fn detail(&self) -> &str {
        match &self.kind {
            OutcomeKind::Encrypted { .. } => "",
            OutcomeKind::Skipped => NO_CREDENTIAL,
            OutcomeKind::Failed { detail } => detail,
        }
    }

    pub fn produced(&self) -> Option<&[u8]> {
        match &self.kind {
            OutcomeKind::Encrypted { produced } => Some(produced),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.status().label();
        match &self.kind {
            OutcomeKind::Encrypted { .. } => write!(f, "[{label}] {}", self.name()),
            OutcomeKind::Skipped => write!(f, "[{label}] {}: {NO_CREDENTIAL}", self.name()),
            OutcomeKind::Failed { detail } => write!(f, "[{label}] {} → {detail}", self.name()),
        }
    }
}

/// Everything a batch produced.
///
/// `outcomes` is in completion order; `ok + skipped + failed == total`.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub total: usize,
    pub ok: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<Outcome>,
    /// The batch was cancelled before every document was started
    pub cancelled: bool,
}

impl BatchResult {
    pub fn outcomes_in_input_order(&self) -> Vec<&Outcome> {
        let mut ordered: Vec<&Outcome> = self.outcomes.iter().collect();
        ordered.sort_by_key(|outcome| outcome.position);
        ordered
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            done: self.outcomes.len(),
            total: self.total,
            ok: self.ok,
            skipped: self.skipped,
            failed: self.failed,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
