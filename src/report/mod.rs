//! Report assembly and rendering
//!
//! Assembly joins host identification with the result matrix; renderers turn
//! the assembled table into a document in one of the pluggable formats.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod assemble;
mod delimited;
mod html;
mod json;
pub mod utils;

pub use assemble::{HOST_INFO_LABEL, PLUGIN_OUTPUT_LABEL, ReportTable, assemble, column_labels, host_info};
pub use delimited::CsvReportRenderer;
pub use html::HtmlReportRenderer;
pub use json::JsonReportRenderer;

/// Pluggable report formats
pub trait ReportRenderer {
    /// Render the whole document as a string
    fn render(&self, table: &ReportTable, metadata: &ReportMetadata) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Align a report path with this format. Paths that already carry one of
    /// the report extensions get this format's extension; any other
    /// extension is left as the user wrote it.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match path.extension().and_then(|ext| ext.to_str()) {
            None | Some("html" | "csv" | "json") => path.with_extension(self.extension()),
            Some(_) => path.to_path_buf(),
        }
    }

    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Html => Box::new(HtmlReportRenderer),
            ReportFormat::Csv => Box::new(CsvReportRenderer),
            ReportFormat::Json => Box::new(JsonReportRenderer),
        }
    }
}

/// Context printed alongside the table
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub plugin_id: String,
    pub generated_at: DateTime<Utc>,
    pub hosts: usize,
}

impl ReportMetadata {
    pub fn new(plugin_id: &str, hosts: usize) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
            generated_at: Utc::now(),
            hosts,
        }
    }
}

/// Render the table and write it to `path`. Nothing is written if rendering
/// fails.
pub fn write_report(
    table: &ReportTable,
    metadata: &ReportMetadata,
    format: ReportFormat,
    path: &Path,
) -> Result<()> {
    let content = format
        .renderer()
        .render(table, metadata)
        .with_context(|| format!("Failed to render {} report", format.extension()))?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!(path = %path.display(), rows = table.row_count(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> ReportTable {
        ReportTable {
            labels: vec![HOST_INFO_LABEL.to_string(), "ssh".to_string()],
            rows: vec![vec![
                "host1<br>10.0.0.1<br>RepoA".to_string(),
                "openssh-server 7.2<br>".to_string(),
            ]],
        }
    }

    #[test]
    fn test_write_report_each_format() {
        let temp_dir = TempDir::new().unwrap();
        let metadata = ReportMetadata::new("22869", 1);

        for format in [ReportFormat::Html, ReportFormat::Csv, ReportFormat::Json] {
            let path = temp_dir.path().join(format!("results.{}", format.extension()));
            write_report(&table(), &metadata, format, &path).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert!(written.contains("openssh-server 7.2"), "{format:?}");
        }
    }

    #[test]
    fn test_output_path_follows_format() {
        assert_eq!(
            ReportFormat::Csv.output_path(Path::new("results.html")),
            PathBuf::from("results.csv")
        );
        assert_eq!(
            ReportFormat::Json.output_path(Path::new("out/report")),
            PathBuf::from("out/report.json")
        );
        assert_eq!(
            ReportFormat::Html.output_path(Path::new("report.htm")),
            PathBuf::from("report.htm")
        );
    }

    #[test]
    fn test_format_parses_from_config_value() {
        let format: ReportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(format, ReportFormat::Csv);
        assert_eq!(ReportFormat::default(), ReportFormat::Html);
    }
}
