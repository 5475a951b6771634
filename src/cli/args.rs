//! Arguments shared by several commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::document::InputDocument;
use crate::mapping::{MappingFormat, MappingReport, parse_mapping_report};

/// Where the credential mapping comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct MappingSource {
    /// Mapping file (CSV/TSV table or filename;password lines)
    #[arg(short, long, value_name = "FILE", conflicts_with = "pairs")]
    pub mapping: Option<PathBuf>,

    /// Inline mapping line, e.g. "report.pdf;hunter2" (repeatable)
    #[arg(short = 'p', long = "pair", value_name = "LINE")]
    pub pairs: Vec<String>,

    /// How to read the mapping
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub mapping_format: Option<MappingFormat>,
}

impl MappingSource {
    /// Read and parse the mapping. `configured` is the format from config,
    /// used when no `--mapping-format` was given.
    pub fn load(&self, configured: MappingFormat) -> Result<MappingReport> {
        let format = self.mapping_format.unwrap_or(configured);

        let (text, format) = match &self.mapping {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
                (text, format.for_path(path))
            }
            None if !self.pairs.is_empty() => (self.pairs.join("\n"), format),
            None => bail!("No mapping given: use --mapping <FILE> or --pair <LINE>"),
        };

        parse_mapping_report(&text, format).context("Invalid credential mapping")
    }
}

/// Turn command line paths into documents. Directories contribute their
/// `*.pdf` files, non-recursively and sorted by name.
pub fn collect_documents(paths: &[PathBuf]) -> Result<Vec<InputDocument>> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            for pdf in pdf_files_in(path)? {
                documents.push(InputDocument::from_path(pdf)?);
            }
        } else if path.is_file() {
            documents.push(InputDocument::from_path(path.clone())?);
        } else {
            bail!("Document not found: {}", path.display());
        }
    }
    Ok(documents)
}

fn pdf_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!("Found {} PDF files in {}", files.len(), dir.display());
    Ok(files)
}
