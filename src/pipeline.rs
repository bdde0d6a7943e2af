//! The two stages of a run
//!
//! `aggregate` queries the platform and produces a record store for the dump
//! file; `tabulate` turns a record store into an assembled report table.

use tracing::{info, warn};

use crate::error::{ReportError, Result};
use crate::matrix::{self, ReportKind};
use crate::records::RecordStore;
use crate::report::{ReportTable, assemble, column_labels, host_info};
use crate::selector::{Selection, build_criteria};
use crate::source::RecordSource;

/// Records fetched for a selection, plus repository names that did not
/// resolve (only non-empty when unmatched names are tolerated).
#[derive(Debug)]
pub struct Aggregation {
    pub store: RecordStore,
    pub unmatched_repositories: Vec<String>,
}

/// Query the platform for one plugin and collect the results.
///
/// The repository catalog is only fetched when repository names were
/// requested. With `strict_repositories` any unknown name fails the run
/// before the analysis query is sent.
pub async fn aggregate<S: RecordSource>(
    source: &S,
    selection: &Selection,
    strict_repositories: bool,
) -> Result<Aggregation> {
    let catalog = if selection.repo_names.is_empty() {
        None
    } else {
        Some(source.repositories().await?)
    };

    let criteria = build_criteria(selection, catalog.as_ref());
    if !criteria.unmatched_repositories.is_empty() {
        if strict_repositories {
            return Err(ReportError::RepositoryNotFound(criteria.unmatched_repositories));
        }
        warn!(unmatched = ?criteria.unmatched_repositories, "Ignoring unknown repositories");
    }

    let raw = source.analysis(&criteria.filters).await?;
    if raw.is_empty() {
        return Err(ReportError::EmptyResult);
    }

    let store = RecordStore::from_raw(&raw)?;
    info!(plugin_id = %selection.plugin_id, records = store.len(), "Aggregated plugin output");

    Ok(Aggregation {
        store,
        unmatched_repositories: criteria.unmatched_repositories,
    })
}

/// Build the report table for a record store.
///
/// Search terms are only valid for plugins with a registered report kind;
/// anything else is rejected before the matrix is built.
pub fn tabulate(store: &RecordStore, terms: &[String], plugin_id: &str) -> Result<ReportTable> {
    if store.is_empty() {
        return Err(ReportError::EmptyResult);
    }
    if !terms.is_empty() && ReportKind::for_plugin(plugin_id).is_none() {
        return Err(ReportError::UnsupportedReportKind(plugin_id.to_string()));
    }

    let records = store.records();
    let matrix = matrix::build(records, terms, plugin_id)?;
    assemble(matrix, host_info(records), column_labels(terms))
}
