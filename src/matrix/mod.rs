//! Query matrix
//!
//! Cross-references hosts against search terms. Rows always follow the record
//! order; columns are either a single full-output column or one per term.

use tracing::debug;

use crate::error::{ReportError, Result};
use crate::records::HostRecord;

pub mod kind;
pub mod software;

pub use kind::{ReportKind, SOFTWARE_ENUMERATION_PLUGIN};
pub use software::match_software;

/// Marker appended after every line placed in a cell.
pub const LINE_BREAK: &str = "<br>";

/// Rectangular grid of cell strings, one row per host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMatrix {
    rows: Vec<Vec<String>>,
    columns: usize,
}

impl ResultMatrix {
    /// Every row must already hold exactly `columns` cells.
    pub(crate) fn from_rows(rows: Vec<Vec<String>>, columns: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns));
        Self { rows, columns }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// Build the result matrix for a record set.
///
/// Without terms every host gets its full plugin output in one column. With
/// terms the plugin's [`ReportKind`] strategy fills one column per term; a
/// plugin without a registered strategy is rejected up front.
pub fn build(records: &[HostRecord], terms: &[String], plugin_id: &str) -> Result<ResultMatrix> {
    if records.is_empty() {
        return Err(ReportError::EmptyResult);
    }

    if terms.is_empty() {
        debug!(records = records.len(), "Building full output matrix");
        return Ok(full_output(records));
    }

    let kind = ReportKind::for_plugin(plugin_id)
        .ok_or_else(|| ReportError::UnsupportedReportKind(plugin_id.to_string()))?;
    debug!(records = records.len(), terms = terms.len(), %kind, "Building search matrix");

    Ok((kind.populate())(records, terms))
}

fn full_output(records: &[HostRecord]) -> ResultMatrix {
    let rows = records
        .iter()
        .map(|record| {
            let mut cell = String::new();
            for line in &record.content {
                cell.push_str(line);
                cell.push_str(LINE_BREAK);
            }
            vec![cell]
        })
        .collect();

    ResultMatrix::from_rows(rows, 1)
}
