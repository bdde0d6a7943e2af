use serde::Serialize;
use tracing::debug;

use super::resolver::{RepositoryCatalog, resolve};

pub const FIELD_PLUGIN_ID: &str = "pluginID";
pub const FIELD_REPOSITORY_IDS: &str = "repositoryIDs";
pub const FIELD_IP: &str = "ip";

/// One `(field, operator, value)` filter understood by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Criterion {
    #[serde(rename = "filterName")]
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl Criterion {
    pub fn equals(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            operator: "=".to_string(),
            value: value.into(),
        }
    }
}

/// What the user asked to narrow the query down to.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub plugin_id: String,
    pub repo_names: Vec<String>,
    pub host_ips: Vec<String>,
    /// CIDR or platform range syntax, passed through untouched
    pub ip_range: Option<String>,
}

/// Filters for one query plus any repository names that did not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub filters: Vec<Criterion>,
    pub unmatched_repositories: Vec<String>,
}

/// Build the ordered filter list for a plugin query.
///
/// The plugin filter always comes first. A host list takes precedence over an
/// IP range when both are supplied.
pub fn build_criteria(selection: &Selection, catalog: Option<&RepositoryCatalog>) -> Criteria {
    let mut criteria = Criteria {
        filters: vec![Criterion::equals(FIELD_PLUGIN_ID, selection.plugin_id.as_str())],
        unmatched_repositories: Vec::new(),
    };

    if !selection.repo_names.is_empty() {
        let empty = RepositoryCatalog::default();
        let resolution = resolve(&selection.repo_names, catalog.unwrap_or(&empty));
        criteria
            .filters
            .push(Criterion::equals(FIELD_REPOSITORY_IDS, resolution.ids));
        criteria.unmatched_repositories = resolution.unmatched;
    }

    if !selection.host_ips.is_empty() {
        criteria
            .filters
            .push(Criterion::equals(FIELD_IP, selection.host_ips.join(",")));
    } else if let Some(range) = selection.ip_range.as_deref().filter(|r| !r.is_empty()) {
        criteria.filters.push(Criterion::equals(FIELD_IP, range));
    }

    debug!(filters = ?criteria.filters, "Built query criteria");
    criteria
}
