use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use clap::Args;

use crate::archive::{ArchiveLayout, totals_line};
use crate::batch::{self, BatchRequest, MappingInput};
use crate::cli::args::{MappingSource, collect_documents};
use crate::cli::output::Output;
use crate::config::{self, CliOverrides};
use crate::config::core::{ArchiveOverrides, BatchOverrides, EngineOverrides, MappingOverrides};
use crate::engine::QpdfEngine;
use crate::error::BatchError;
use crate::pipeline::CancellationToken;

#[derive(Args)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub source: MappingSource,

    /// PDF files, or directories whose *.pdf files are used
    #[arg(required = true, value_name = "DOCS")]
    pub documents: Vec<PathBuf>,

    /// Archive to write [default: encrypted_pdfs_<unix-millis>.zip]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Archive layout
    #[arg(long, value_enum)]
    pub layout: Option<ArchiveLayout>,

    /// Documents encrypted at the same time (0 = auto)
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Largest batch accepted
    #[arg(long)]
    pub max_documents: Option<usize>,

    /// qpdf executable name or path
    #[arg(long, value_name = "PROGRAM")]
    pub qpdf: Option<String>,
}

impl EncryptArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            batch: BatchOverrides {
                concurrency: self.concurrency,
                max_documents: self.max_documents,
            },
            archive: ArchiveOverrides { layout: self.layout },
            engine: EngineOverrides {
                program: self.qpdf.clone(),
            },
            mapping: MappingOverrides {
                format: self.source.mapping_format,
            },
        }
    }
}

pub async fn execute(args: EncryptArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = config::load(custom_config, Some(args.overrides()))?;

    let report = args.source.load(config.mapping.format)?;
    let documents = collect_documents(&args.documents)?;
    output.info(&format!(
        "{} credential records, {} documents",
        report.table.len(),
        documents.len()
    ));

    let destination = args.output.clone().unwrap_or_else(default_archive_name);

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing documents in progress");
            signal_token.cancel();
        }
    });

    let options = config.batch_options(cancel);
    output.verbose(&format!(
        "Layout {:?}, concurrency {}, engine {}",
        options.archive.layout,
        options.concurrency,
        config.engine.program
    ));
    let engine = QpdfEngine::new(config.engine.clone());
    let request = BatchRequest {
        mapping: MappingInput::Table(report.table),
        documents,
    };

    let pb = output.progress_bar(request.documents.len() as u64, "Encrypting");
    let bar = pb.clone();
    let submitted = tokio::task::spawn_blocking(move || {
        batch::submit(request, &engine, &options, |snapshot| {
            bar.set_position(snapshot.done as u64);
            bar.set_message(format!(
                "{}% ok {} skipped {} failed {}",
                snapshot.percent(),
                snapshot.ok,
                snapshot.skipped,
                snapshot.failed
            ));
        })
    })
    .await
    .context("Encryption task failed")?;
    pb.finish_and_clear();

    let batch_output = match submitted {
        Ok(batch_output) => batch_output,
        Err(BatchError::Archive { source, result }) => {
            output.error(&totals_line(&result));
            return Err(anyhow!(source).context("Failed to build the archive"));
        }
        Err(e) => return Err(e.into()),
    };

    let result = &batch_output.result;
    output.category("Results");
    for outcome in result.outcomes_in_input_order() {
        output.outcome(outcome);
    }
    output.blank_line();

    write_atomically(&destination, &batch_output.archive)?;

    output.key_value("Summary:", &totals_line(result), false);
    if result.cancelled {
        output.warning("Batch was cancelled; unstarted documents are reported as failed");
    }
    if result.has_failures() {
        output.warning(&format!("{} documents failed, see the report for details", result.failed));
    }
    if result.ok == 0 {
        output.warning("No document was encrypted");
    }
    output.success(&format!("Archive written to {}", destination.display()));
    Ok(())
}

fn default_archive_name() -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    PathBuf::from(format!("encrypted_pdfs_{millis}.zip"))
}

// Nothing appears at `destination` unless the whole archive was written
fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(destination)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    Ok(())
}
