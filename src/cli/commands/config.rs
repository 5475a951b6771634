use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::output::Output;
use crate::config::{self, CliOverrides, ConfigFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Check that the merged configuration is usable
    Validate,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = config::load(custom_config, None::<CliOverrides>)?;

    match args.command {
        ConfigCommand::Show { format } => {
            println!("{}", config.export(format)?);
        }
        ConfigCommand::Validate => {
            output.success("Configuration is valid");
            output.key_value("Concurrency:", &concurrency_label(config.batch.concurrency), false);
            output.key_value("Max documents:", &config.batch.max_documents.to_string(), false);
            output.key_value("qpdf:", &config.engine.program, false);
        }
    }
    Ok(())
}

fn concurrency_label(concurrency: usize) -> String {
    match concurrency {
        0 => "auto".to_string(),
        n => n.to_string(),
    }
}
