use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::cli::args::MappingSource;
use crate::cli::output::Output;
use crate::config::{self, CliOverrides};

#[derive(Args)]
pub struct MappingArgs {
    #[command(flatten)]
    pub source: MappingSource,

    /// Print passwords instead of masking them
    #[arg(long)]
    pub show_passwords: bool,
}

pub async fn execute(args: MappingArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = config::load(custom_config, None::<CliOverrides>)?;
    let report = args.source.load(config.mapping.format)?;

    output.header("Credential mapping");
    output.key_value("Format:", &format!("{:?}", report.format).to_lowercase(), false);
    output.key_value("Records:", &report.table.len().to_string(), true);
    output.blank_line();

    for record in report.table.records() {
        let password = if args.show_passwords {
            record.password.clone()
        } else {
            mask(&record.password)
        };
        println!("{}\t{}", record.filename, password);
    }

    if !report.rejected.is_empty() {
        output.category("Ignored lines");
        for rejected in &report.rejected {
            output.list_item(&format!("line {}: {}", rejected.line, rejected.content));
        }
    }
    Ok(())
}

fn mask(password: &str) -> String {
    "*".repeat(password.chars().count().clamp(4, 12))
}
