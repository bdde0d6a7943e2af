//! Report kinds with term-matching strategies
//!
//! A report kind is picked by the plugin being queried. Each kind owns the
//! function that fills the matrix when search terms are supplied.

use std::fmt;

use super::ResultMatrix;
use super::software::match_software;
use crate::records::HostRecord;

/// Plugin id of the "Software Enumeration (SSH)" check.
pub const SOFTWARE_ENUMERATION_PLUGIN: &str = "22869";

/// Fills a `records × terms` matrix.
pub type Populate = fn(&[HostRecord], &[String]) -> ResultMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    SoftwareEnumeration,
}

/// Every kind with a term-matching strategy, keyed by plugin id.
const REGISTRY: &[(ReportKind, &str, Populate)] = &[(
    ReportKind::SoftwareEnumeration,
    SOFTWARE_ENUMERATION_PLUGIN,
    match_software,
)];

impl ReportKind {
    /// Look up the kind registered for a plugin id (exact match).
    pub fn for_plugin(plugin_id: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(_, id, _)| *id == plugin_id)
            .map(|(kind, _, _)| *kind)
    }

    pub fn plugin_id(self) -> &'static str {
        self.entry().1
    }

    pub fn populate(self) -> Populate {
        self.entry().2
    }

    fn entry(self) -> &'static (ReportKind, &'static str, Populate) {
        REGISTRY
            .iter()
            .find(|(kind, _, _)| *kind == self)
            .unwrap_or_else(|| unreachable!("every ReportKind has a registry entry"))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::SoftwareEnumeration => write!(f, "software enumeration"),
        }
    }
}
