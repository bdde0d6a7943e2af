use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::overrides::skip_unset;
use super::smart_load;
use crate::error::ReportError;
use crate::report::ReportFormat;
use crate::selector::Selection;
use crate::source::ClientSettings;
use crate::terms::{read_list, read_terms};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub const ENV_PREFIX: &str = "PLUGIN_REPORT_";

/// Effective settings for one run, merged from every configuration layer.
///
/// Path-like keys use an empty string for "not configured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Security Center host name or base URL
    #[serde(deserialize_with = "scalar_string")]
    pub host: String,
    #[serde(deserialize_with = "scalar_string")]
    pub username: String,
    #[serde(deserialize_with = "scalar_string")]
    pub password: String,
    #[serde(deserialize_with = "scalar_string")]
    pub plugin_id: String,

    /// File with one search term per line
    #[serde(deserialize_with = "scalar_string")]
    pub search_list: String,
    /// File with one repository name per line
    #[serde(deserialize_with = "scalar_string")]
    pub repo_list: String,
    /// File with one IP address per line
    #[serde(deserialize_with = "scalar_string")]
    pub host_list: String,
    /// CIDR or platform range expression; ignored when a host list is given
    #[serde(deserialize_with = "scalar_string")]
    pub ip_range: String,

    #[serde(deserialize_with = "scalar_path")]
    pub dump_file: PathBuf,
    #[serde(deserialize_with = "scalar_path")]
    pub output_file: PathBuf,
    pub format: ReportFormat,
    /// Older configs select CSV output with a boolean
    #[serde(default)]
    pub csv: bool,

    pub max_results: usize,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
}

impl ReportConfig {
    /// Load configuration with the standard precedence:
    /// defaults < user config < project config < `--config` file < environment < CLI.
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Toml::file(Self::user_config_base_path().with_extension("toml")))
            .merge(Json::file(Self::user_config_base_path().with_extension("json")))
            .merge(Yaml::file(Self::user_config_base_path().with_extension("yaml")))
            .merge(Toml::file("plugin-report.toml"))
            .merge(Json::file("plugin-report.json"))
            .merge(Yaml::file("plugin-report.yaml"))
            .merge(Yaml::file("plugin-report.yml"));

        if let Some(path) = custom_config {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(smart_load::auto(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        // A format chosen in the environment outranks a `csv` switch from any file
        if env::var_os(format!("{ENV_PREFIX}FORMAT")).is_some() && env::var_os(format!("{ENV_PREFIX}CSV")).is_none() {
            figment = figment.merge(Serialized::default("csv", false));
        }

        if let Some(overrides) = cli_overrides {
            figment = figment.merge(Serialized::defaults(skip_unset(overrides)));
        }

        let config: ReportConfig = figment.extract().context("Invalid configuration")?;
        tracing::trace!(?config.plugin_id, format = ?config.format, "Configuration loaded");
        Ok(config)
    }

    pub fn effective_format(&self) -> ReportFormat {
        if self.csv { ReportFormat::Csv } else { self.format }
    }

    /// Plugin id to query or report on; required by every stage.
    pub fn require_plugin_id(&self) -> Result<&str> {
        let id = self.plugin_id.trim();
        if id.is_empty() {
            bail!("No plugin id configured; pass --plugin-id or set plugin_id in the config file");
        }
        Ok(id)
    }

    pub fn credentials(&self) -> std::result::Result<(&str, &str), ReportError> {
        if self.host.trim().is_empty() {
            return Err(ReportError::MissingCredentials("host"));
        }
        if self.username.is_empty() {
            return Err(ReportError::MissingCredentials("username"));
        }
        if self.password.is_empty() {
            return Err(ReportError::MissingCredentials("password"));
        }
        Ok((&self.username, &self.password))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            host: self.host.trim().to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            accept_invalid_certs: self.accept_invalid_certs,
            max_results: self.max_results,
        }
    }

    /// Read the repository and host list files into a query selection.
    pub fn selection(&self) -> Result<Selection> {
        Ok(Selection {
            plugin_id: self.require_plugin_id()?.to_string(),
            repo_names: match configured(&self.repo_list) {
                Some(path) => read_list(path)?,
                None => Vec::new(),
            },
            host_ips: match configured(&self.host_list) {
                Some(path) => read_list(path)?,
                None => Vec::new(),
            },
            ip_range: Some(self.ip_range.trim().to_string()).filter(|range| !range.is_empty()),
        })
    }

    /// Search terms, or none when no search list is configured.
    pub fn search_terms(&self) -> Result<Vec<String>> {
        match configured(&self.search_list) {
            Some(path) => read_terms(path),
            None => Ok(Vec::new()),
        }
    }

    /// Copy suitable for display, with the password masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }

    /// Write this configuration as TOML.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn user_config_base_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config/plugin-report/config"),
            Err(_) => PathBuf::from("~/.config/plugin-report/config"),
        }
    }
}

fn configured(value: &str) -> Option<&Path> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| Path::new(trimmed))
}

/// Text keys read back as strings even when a source typed them.
///
/// The environment provider parses `12345678` as an integer and `true` as a
/// bool, and plugin ids are often written unquoted in config files.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Bool(b) => b.to_string(),
    })
}

fn scalar_path<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<PathBuf, D::Error> {
    scalar_string(deserializer).map(PathBuf::from)
}
