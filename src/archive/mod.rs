//! Archive assembly
//!
//! Packages a finished batch into a zip archive, in memory with
//! [`assemble`] or into any seekable writer with [`assemble_into`].
//!
//! - [`ArchiveLayout::Flat`]: encrypted documents at the archive root, under
//!   their original names. Skipped and failed documents are left out.
//! - [`ArchiveLayout::Dual`]: encrypted documents under the encrypted folder,
//!   the untouched originals of skipped and failed documents under the
//!   not-encrypted folder, and the summary report at the root.
//!
//! Entries are written in input order. Every entry is deflated at the
//! configured level. Document names are reduced to their last path
//! component, so no entry can point outside the archive root.

use std::collections::HashSet;
use std::io::{Cursor, Seek, Write};

use serde::{Deserialize, Serialize};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ArchiveError;
use crate::pipeline::{BatchResult, OutcomeKind};

mod report;

pub use report::{render_report, totals_line};

/// Highest deflate level.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveLayout {
    /// Encrypted documents only
    Flat,
    /// Encrypted and not-encrypted folders plus a summary report
    #[default]
    Dual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveOptions {
    pub layout: ArchiveLayout,
    /// Deflate level, 0-9
    pub compression_level: u8,
    pub encrypted_dir: String,
    pub unencrypted_dir: String,
    pub report_name: String,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            layout: ArchiveLayout::Dual,
            compression_level: 6,
            encrypted_dir: "encrypted".to_string(),
            unencrypted_dir: "not-encrypted".to_string(),
            report_name: "summary.txt".to_string(),
        }
    }
}

/// Build the archive for a finished batch in memory.
pub fn assemble(result: &BatchResult, options: &ArchiveOptions) -> Result<Vec<u8>, ArchiveError> {
    let bytes = assemble_into(result, options, Cursor::new(Vec::new()))?.into_inner();
    tracing::debug!("Archive assembled: {} bytes", bytes.len());
    Ok(bytes)
}

/// Write the archive for a finished batch to `sink` and hand the sink back.
pub fn assemble_into<W: Write + Seek>(
    result: &BatchResult,
    options: &ArchiveOptions,
    sink: W,
) -> Result<W, ArchiveError> {
    if options.compression_level > MAX_COMPRESSION_LEVEL {
        return Err(ArchiveError::CompressionLevel(options.compression_level));
    }

    let file_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(options.compression_level.into()))
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(sink);
    let mut names = EntryNames::default();

    for outcome in result.outcomes_in_input_order() {
        match (&outcome.kind, options.layout) {
            (OutcomeKind::Encrypted { produced }, ArchiveLayout::Flat) => {
                let entry = names.claim("", outcome.name());
                zip.start_file(entry, file_options)?;
                zip.write_all(produced)?;
            }
            (OutcomeKind::Encrypted { produced }, ArchiveLayout::Dual) => {
                let entry = names.claim(&options.encrypted_dir, outcome.name());
                zip.start_file(entry, file_options)?;
                zip.write_all(produced)?;
            }
            (_, ArchiveLayout::Flat) => {}
            (_, ArchiveLayout::Dual) => match outcome.document.read() {
                Ok(original) => {
                    let entry = names.claim(&options.unencrypted_dir, outcome.name());
                    zip.start_file(entry, file_options)?;
                    zip.write_all(&original)?;
                }
                Err(e) => {
                    tracing::warn!(
                        "Leaving {} out of the archive: cannot read original: {}",
                        outcome.name(),
                        e
                    );
                }
            },
        }
    }

    if options.layout == ArchiveLayout::Dual {
        let entry = names.claim("", &options.report_name);
        zip.start_file(entry, file_options)?;
        zip.write_all(render_report(result).as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Tracks used entry paths and renames clashes to `name (2).ext`, `name (3).ext`, ...
#[derive(Debug, Default)]
struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    fn claim(&mut self, dir: &str, name: &str) -> String {
        let name = file_component(name);
        let mut candidate = entry_path(dir, name);
        let mut counter = 2;
        while self.used.contains(&candidate) {
            candidate = entry_path(dir, &numbered(name, counter));
            counter += 1;
        }
        if counter > 2 {
            tracing::warn!("Duplicate archive entry {} stored as {}", name, candidate);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn entry_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

/// Last path component of a document name, split on both `/` and `\`.
fn file_component(name: &str) -> &str {
    match name.rsplit(['/', '\\']).next() {
        Some(last) if !last.is_empty() && last != "." && last != ".." => last,
        _ => "document",
    }
}

fn numbered(name: &str, counter: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({counter}).{ext}"),
        _ => format!("{name} ({counter})"),
    }
}
