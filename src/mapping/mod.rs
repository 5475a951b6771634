//! Credential mapping parsing
//!
//! Turns raw mapping text into a [`CredentialTable`]. Two input shapes are
//! supported:
//!
//! - **Tabular**: a delimited upload (CSV, TSV, `;` or `|` separated), with
//!   or without a header row.
//! - **Freeform**: pasted `filename;password` lines where each line picks
//!   its own separator.
//!
//! Both shapes share the same normalization (full-width punctuation, line
//! endings) and the same record rules: fields are trimmed, trailing `;` runs
//! are stripped, empty fields drop the record, and a filename defined twice
//! keeps the password read last.
//!
//! ```rust
//! use pdfseal::mapping::{parse_mapping, MappingFormat};
//!
//! let table = parse_mapping("a.pdf；p1\na.pdf;p2\n", MappingFormat::Freeform).unwrap();
//! assert_eq!(table.password("a.pdf"), Some("p2"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ParseError;

mod freeform;
mod normalize;
mod tabular;

pub use freeform::{FALLBACK_DELIMITERS, split_line};
pub use normalize::{normalize_text, strip_trailing_semicolons};

/// One filename → password association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRecord {
    pub filename: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(filename: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            password: password.into(),
        }
    }

    /// Build a record from raw field values.
    ///
    /// Both fields are trimmed and stripped of trailing semicolons; `None` is
    /// returned when either ends up empty.
    pub fn from_fields(filename: &str, password: &str) -> Option<Self> {
        let filename = normalize::clean_field(filename);
        let password = normalize::clean_field(password);
        if filename.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { filename, password })
    }
}

/// Deduplicated filename → password table.
///
/// Lookups are exact and case-sensitive. Inserting an existing filename
/// replaces its password but keeps the position of its first appearance.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    records: Vec<CredentialRecord>,
    index: HashMap<String, usize>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the password it replaced, if any.
    pub fn insert(&mut self, record: CredentialRecord) -> Option<String> {
        match self.index.get(&record.filename) {
            Some(&position) => Some(std::mem::replace(
                &mut self.records[position].password,
                record.password,
            )),
            None => {
                self.index.insert(record.filename.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, filename: &str) -> Option<&CredentialRecord> {
        self.index.get(filename).map(|&position| &self.records[position])
    }

    pub fn password(&self, filename: &str) -> Option<&str> {
        self.get(filename).map(|record| record.password.as_str())
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.index.contains_key(filename)
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CredentialRecord> for CredentialTable {
    fn from_iter<I: IntoIterator<Item = CredentialRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            if let Some(previous) = table.index.get(&record.filename) {
                tracing::debug!(
                    "Mapping entry for {} redefined (entry {}); later password wins",
                    record.filename,
                    previous + 1
                );
            }
            table.insert(record);
        }
        table
    }
}

/// Shape of the mapping text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MappingFormat {
    /// Decide from the file extension or the first line
    #[default]
    Auto,
    /// Delimited table, optionally with a header row
    Tabular,
    /// Pasted `filename;password` lines
    Freeform,
}

impl MappingFormat {
    /// Resolve `Auto` from a source file name: `.csv` and `.tsv` are tabular.
    pub fn for_path(self, path: &Path) -> Self {
        if self != MappingFormat::Auto {
            return self;
        }
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") | Some("tsv") => MappingFormat::Tabular,
            _ => MappingFormat::Auto,
        }
    }

    /// Resolve `Auto` from normalized text: a header row with both filename
    /// and password labels means tabular, anything else is freeform.
    fn for_text(self, normalized: &str) -> Self {
        if self != MappingFormat::Auto {
            return self;
        }
        let first_line = normalized.lines().find(|line| !line.trim().is_empty());
        match first_line {
            Some(line) if tabular::is_header_line(line) => MappingFormat::Tabular,
            _ => MappingFormat::Freeform,
        }
    }
}

/// A line or row that did not yield a usable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the normalized text
    pub line: usize,
    pub content: String,
}

/// Parsed table plus what was dropped on the way.
#[derive(Debug, Clone)]
pub struct MappingReport {
    pub table: CredentialTable,
    pub format: MappingFormat,
    pub rejected: Vec<RejectedLine>,
}

/// Parse mapping text into a credential table.
pub fn parse_mapping(text: &str, format: MappingFormat) -> Result<CredentialTable, ParseError> {
    parse_mapping_report(text, format).map(|report| report.table)
}

/// Parse mapping text, also reporting the resolved format and rejected lines.
pub fn parse_mapping_report(text: &str, format: MappingFormat) -> Result<MappingReport, ParseError> {
    let normalized = normalize_text(text);
    if normalized.trim().is_empty() {
        return Err(ParseError::EmptyMapping);
    }

    let format = format.for_text(&normalized);
    let (records, rejected) = match format {
        MappingFormat::Tabular => tabular::parse(&normalized),
        MappingFormat::Freeform | MappingFormat::Auto => freeform::parse(&normalized),
    };

    let table: CredentialTable = records.into_iter().collect();
    if table.is_empty() {
        return Err(ParseError::NoValidRecords);
    }

    tracing::debug!(
        "Parsed {} credential records ({:?}), {} rejected",
        table.len(),
        format,
        rejected.len()
    );

    Ok(MappingReport {
        table,
        format,
        rejected,
    })
}

#[cfg(test)]
mod tests;
