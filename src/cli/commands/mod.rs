use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod config;
pub mod encrypt;
pub mod mapping;
pub mod preview;
pub mod version;

use super::output::Output;

#[derive(Parser)]
#[command(
    name = "pdfseal",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch-encrypt PDF documents from a filename/password mapping",
    long_about = "pdfseal matches each document against a credential mapping, encrypts the \
                  matched ones with qpdf (AES-256, same user and owner password) and packages \
                  the results into a single zip archive with a per-file report."
)]
pub struct Cli {
    /// Use custom configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt documents and write the archive
    Encrypt(encrypt::EncryptArgs),
    /// Show which documents have a credential, without encrypting
    Preview(preview::PreviewArgs),
    /// Parse a mapping and list the resulting credential table
    Mapping(mapping::MappingArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.config.as_deref();

        match self.command {
            Some(Commands::Encrypt(args)) => encrypt::execute(args, config, &output).await,
            Some(Commands::Preview(args)) => preview::execute(args, config, &output).await,
            Some(Commands::Mapping(args)) => mapping::execute(args, config, &output).await,
            Some(Commands::Config(args)) => config::execute(args, config, &output).await,
            Some(Commands::Version) => version::execute(config, &output).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info"),
        2 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    // stdout carries command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
