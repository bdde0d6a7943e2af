//! CSV report renderer

use anyhow::{Context, Result, anyhow};

use super::utils::plain_cell;
use super::{ReportMetadata, ReportRenderer, ReportTable};

/// One CSV record per host; multi-line cells are quoted with real newlines
pub struct CsvReportRenderer;

impl ReportRenderer for CsvReportRenderer {
    fn render(&self, table: &ReportTable, _metadata: &ReportMetadata) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let header = std::iter::once(String::new()).chain(table.labels.iter().cloned());
        writer.write_record(header)?;

        for (index, row) in table.rows.iter().enumerate() {
            let record = std::iter::once((index + 1).to_string()).chain(row.iter().map(|cell| plain_cell(cell)));
            writer.write_record(record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}
