//! Command implementations for the plugin-report CLI
//!
//! Each command lives in its own module. Settings shared by every stage are
//! collected in [`SettingsArgs`] and merged over the configuration files.

use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::overrides::skip_unset;
use crate::report::ReportFormat;

pub mod config;
pub mod dump;
pub mod report;
pub mod run;

/// Command-line overrides for configuration keys. Unset flags leave the
/// configured value alone.
#[derive(Args, Serialize, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Plugin id to query (e.g. 22869 for software enumeration)
    #[arg(short, long)]
    pub plugin_id: Option<String>,

    /// Security Center host name or base URL
    #[arg(long)]
    pub host: Option<String>,

    /// Security Center user name
    #[arg(short, long)]
    pub username: Option<String>,

    /// Security Center password (prefer PLUGIN_REPORT_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// File with one search term per line
    #[arg(short, long, value_name = "FILE")]
    pub search_list: Option<String>,

    /// File with one repository name per line
    #[arg(long, value_name = "FILE")]
    pub repo_list: Option<String>,

    /// File with one IP address per line
    #[arg(long, value_name = "FILE")]
    pub host_list: Option<String>,

    /// IP range in CIDR or platform range notation
    #[arg(long)]
    pub ip_range: Option<String>,

    /// Dump file shared between the dump and report stages
    #[arg(long, value_name = "FILE")]
    pub dump_file: Option<PathBuf>,

    /// Report output file
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Maximum number of results requested from the platform
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub accept_invalid_certs: bool,
}

impl SettingsArgs {
    /// Override layer for the config loader. An explicit `--format` also
    /// clears the legacy `csv` switch so a config file cannot overrule it.
    pub fn overrides(&self) -> Value {
        let mut value = skip_unset(self);
        if self.format.is_some() {
            if let Value::Object(map) = &mut value {
                map.insert("csv".to_string(), Value::Bool(false));
            }
        }
        value
    }
}
