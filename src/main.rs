use anyhow::Result;
use clap::Parser;

use plugin_report::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
