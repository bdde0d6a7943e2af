use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use super::SettingsArgs;
use crate::cli::Output;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::pipeline;
use crate::records::RecordStore;
use crate::source::SecurityCenterClient;

#[derive(Args, Debug, Default)]
pub struct DumpArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Fail when a repository name does not exist on the platform
    #[arg(long)]
    pub strict_repos: bool,
}

pub async fn execute(args: DumpArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = ReportConfig::load(config_path, Some(args.settings.overrides()))?;

    output.header("Dumping plugin output");
    if let Some(store) = fetch(&config, args.strict_repos, output).await? {
        save(&store, &config, output)?;
    }
    Ok(())
}

/// Log in, query the platform and return the collected records.
/// `None` means the query matched nothing, which is reported but not an error.
pub(super) async fn fetch(
    config: &ReportConfig,
    strict_repos: bool,
    output: &Output,
) -> Result<Option<RecordStore>> {
    let selection = config.selection()?;
    let (username, password) = config.credentials()?;
    let settings = config.client_settings();

    output.key_value("Host", &settings.host);
    output.key_value("Plugin", &selection.plugin_id);

    let mut client = SecurityCenterClient::new(&settings)?;
    let spinner = output.spinner("Querying Security Center...");
    let result = async {
        client.login(username, password).await?;
        pipeline::aggregate(&client, &selection, strict_repos).await
    }
    .await;
    spinner.finish_and_clear();

    match result {
        Ok(aggregation) => {
            for name in &aggregation.unmatched_repositories {
                output.warning(&format!("Repository not found: {name}"));
            }
            output.success(&format!("Fetched output for {} hosts", aggregation.store.len()));
            Ok(Some(aggregation.store))
        }
        Err(ReportError::EmptyResult) => {
            output.info("No result found");
            Ok(None)
        }
        Err(e) => Err(e).context("Security Center query failed"),
    }
}

pub(super) fn save(store: &RecordStore, config: &ReportConfig, output: &Output) -> Result<()> {
    store
        .save(&config.dump_file)
        .with_context(|| format!("Failed to write dump file: {}", config.dump_file.display()))?;
    output.success(&format!("Dump written to {}", config.dump_file.display()));
    Ok(())
}
