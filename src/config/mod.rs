//! Configuration management
//!
//! Settings are layered with figment: embedded defaults, then user and project
//! config files (TOML, JSON or YAML), an explicit `--config` file,
//! `PLUGIN_REPORT_*` environment variables and finally command-line flags.

mod core;
pub mod overrides;
pub mod smart_load;

pub use self::core::{ENV_PREFIX, ReportConfig};
