use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::cli::args::{MappingSource, collect_documents};
use crate::cli::output::Output;
use crate::config::{self, CliOverrides};
use crate::matcher::MatchPreview;

/// Documents listed before the rest is summarized.
const PREVIEW_LIMIT: usize = 10;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: MappingSource,

    /// PDF files, or directories whose *.pdf files are used
    #[arg(required = true, value_name = "DOCS")]
    pub documents: Vec<PathBuf>,

    /// List every document instead of the first 10
    #[arg(long)]
    pub all: bool,
}

pub async fn execute(args: PreviewArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = config::load(custom_config, None::<CliOverrides>)?;
    let report = args.source.load(config.mapping.format)?;
    let documents = collect_documents(&args.documents)?;

    let preview = MatchPreview::build(&report.table, &documents);

    output.header("Match preview");
    output.key_value("Credential records:", &preview.records.to_string(), false);
    output.key_value("Documents:", &preview.documents.to_string(), false);
    output.key_value("With credential:", &preview.matched.to_string(), true);
    if !report.rejected.is_empty() {
        output.key_value("Ignored mapping lines:", &report.rejected.len().to_string(), false);
    }
    output.blank_line();

    let shown = if args.all { preview.entries.len() } else { PREVIEW_LIMIT };
    for entry in preview.entries.iter().take(shown) {
        output.preview_entry(&entry.name, entry.matched);
    }
    if preview.entries.len() > shown {
        output.info(&format!(
            "Showing first {} of {} documents (use --all to list every one)",
            shown,
            preview.entries.len()
        ));
    }

    if preview.unmatched() > 0 {
        output.warning(&format!(
            "{} documents have no credential and will be skipped",
            preview.unmatched()
        ));
    }
    Ok(())
}
