use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use super::SettingsArgs;
use crate::cli::Output;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::pipeline;
use crate::records::RecordStore;
use crate::report::{ReportMetadata, write_report};

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn execute(args: ReportArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = ReportConfig::load(config_path, Some(args.settings.overrides()))?;

    output.header("Building report");
    let store = RecordStore::load(&config.dump_file)
        .with_context(|| format!("Failed to read dump file: {}", config.dump_file.display()))?;
    output.verbose(&format!("Loaded {} records from {}", store.len(), config.dump_file.display()));

    render(&store, &config, output)
}

/// Tabulate the records and write the report in the configured format.
pub(super) fn render(store: &RecordStore, config: &ReportConfig, output: &Output) -> Result<()> {
    let plugin_id = config.require_plugin_id()?;
    let terms = config.search_terms()?;
    if terms.is_empty() {
        output.verbose("No search terms, reporting full plugin output");
    }

    let table = match pipeline::tabulate(store, &terms, plugin_id) {
        Ok(table) => table,
        Err(ReportError::EmptyResult) => {
            output.info("No result found");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let format = config.effective_format();
    let path = format.output_path(&config.output_file);
    let metadata = ReportMetadata::new(plugin_id, table.row_count());
    write_report(&table, &metadata, format, &path)?;

    output.success(&format!(
        "Report for {} hosts written to {}",
        table.row_count(),
        path.display()
    ));
    Ok(())
}
