//! Command-line interface for plugin-report
//!
//! `dump` fetches plugin output from Security Center into a dump file,
//! `report` renders a dump file, and `run` does both in one go.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

/// Dump vulnerability-scanner plugin output per host and render it as a report
#[derive(Parser)]
#[command(name = "plugin-report", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path (TOML, JSON or YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query Security Center and write the plugin output dump file
    Dump(commands::dump::DumpArgs),
    /// Render a report from an existing dump file
    Report(commands::report::ReportArgs),
    /// Dump and report in one step
    Run(commands::run::RunArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Dump(args) => commands::dump::execute(args, config_path, &output).await,
            Commands::Report(args) => commands::report::execute(args, config_path, &output),
            Commands::Run(args) => commands::run::execute(args, config_path, &output).await,
            Commands::Config(cmd) => commands::config::execute(cmd, config_path, &output),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn"),
        2 => tracing_subscriber::EnvFilter::new("debug,reqwest=info,hyper=warn,rustls=warn"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
