//! # plugin-report
//!
//! Dumps the output of one vulnerability-scanner plugin for every matching
//! host from Tenable Security Center, then renders it as a host-by-term
//! report.
//!
//! For the software enumeration plugin (22869) each search term becomes a
//! column holding the lines of installed software that contain it. Without
//! search terms the report carries the full plugin output per host.
//!
//! ```bash
//! # Query the platform and write pluginText.dump
//! plugin-report dump --plugin-id 22869 --host sc.example.edu -u auditor
//!
//! # Render results.html from the dump
//! plugin-report report --plugin-id 22869 --search-list search.txt
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod selector;
pub mod source;
pub mod terms;

pub use cli::{Cli, Output};
pub use config::ReportConfig;
pub use error::ReportError;

/// Result type alias for CLI operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
