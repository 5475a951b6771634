//! File matching
//!
//! Pairs documents with credential records. A document name is tried
//! verbatim first, then trimmed. There is no case folding and no fuzzy
//! matching: `Report.pdf` does not match `report.pdf`.

use serde::Serialize;

use crate::document::InputDocument;
use crate::mapping::{CredentialRecord, CredentialTable};

/// Find the credential record for a document name.
pub fn match_credential<'t>(table: &'t CredentialTable, name: &str) -> Option<&'t CredentialRecord> {
    table.get(name).or_else(|| table.get(name.trim()))
}

/// One document's line in a [`MatchPreview`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub name: String,
    pub matched: bool,
}

/// Summary of a credential table against a document set, before any
/// encryption happens.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPreview {
    pub records: usize,
    pub documents: usize,
    pub matched: usize,
    pub entries: Vec<PreviewEntry>,
}

impl MatchPreview {
    pub fn build(table: &CredentialTable, documents: &[InputDocument]) -> Self {
        let entries: Vec<PreviewEntry> = documents
            .iter()
            .map(|document| PreviewEntry {
                name: document.name().to_string(),
                matched: match_credential(table, document.name()).is_some(),
            })
            .collect();

        Self {
            records: table.len(),
            documents: documents.len(),
            matched: entries.iter().filter(|entry| entry.matched).count(),
            entries,
        }
    }

    pub fn unmatched(&self) -> usize {
        self.documents - self.matched
    }
}
