use anyhow::Result;
use clap::Parser;

use pdfseal::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
