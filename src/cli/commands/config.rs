//! Configuration command implementations

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::SettingsArgs;
use crate::cli::Output;
use crate::config::{ENV_PREFIX, ReportConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the effective configuration to a TOML file
    Init(InitArgs),
    /// Show the effective configuration (password masked)
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination file
    #[arg(default_value = "plugin-report.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print as JSON instead of TOML
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn execute(cmd: ConfigCommands, config_path: Option<&Path>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => init(args, config_path, output),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: InitArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            args.path.display()
        );
    }

    let mut config = ReportConfig::load(config_path, Some(args.settings.overrides()))?;
    // Secrets belong in the environment, not in a file that may be committed
    config.password.clear();
    config.save_to_file(&args.path)?;

    output.success("Configuration file created");
    output.key_value("Config file", &args.path.display().to_string());
    output.info(&format!("Set {ENV_PREFIX}PASSWORD to supply the password"));
    Ok(())
}

fn show(args: ShowArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ReportConfig::load(config_path, Some(args.settings.overrides()))?.redacted();

    let rendered = if args.json {
        serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
    } else {
        toml::to_string_pretty(&config).context("Failed to serialize configuration")?
    };
    println!("{rendered}");
    Ok(())
}
