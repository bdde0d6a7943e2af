use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::SettingsArgs;
use super::{dump, report};
use crate::cli::Output;
use crate::config::ReportConfig;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Fail when a repository name does not exist on the platform
    #[arg(long)]
    pub strict_repos: bool,
}

pub async fn execute(args: RunArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = ReportConfig::load(config_path, Some(args.settings.overrides()))?;
    // Search terms are read up front so a bad list fails before the platform is queried
    config.search_terms()?;

    output.header("Dumping plugin output");
    let Some(store) = dump::fetch(&config, args.strict_repos, output).await? else {
        return Ok(());
    };
    dump::save(&store, &config, output)?;

    output.header("Building report");
    report::render(&store, &config, output)
}
