//! JSON report renderer

use anyhow::Result;
use serde_json::json;

use super::utils::plain_cell;
use super::{ReportMetadata, ReportRenderer, ReportTable};

/// Machine-friendly report: metadata plus rows of labelled cells
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn render(&self, table: &ReportTable, metadata: &ReportMetadata) -> Result<String> {
        let report = json!({
            "report_metadata": {
                "plugin_id": metadata.plugin_id,
                "generated_at": metadata.generated_at.to_rfc3339(),
                "hosts": metadata.hosts,
                "tool_version": env!("CARGO_PKG_VERSION"),
            },
            "columns": table.labels,
            "rows": table.rows.iter().enumerate().map(|(index, row)| json!({
                "index": index + 1,
                "cells": table.labels.iter().zip(row).map(|(label, cell)| json!({
                    "label": label,
                    "value": plain_cell(cell),
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        });

        Ok(serde_json::to_string_pretty(&report)?)
    }
}
