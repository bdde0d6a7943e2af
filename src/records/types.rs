use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};

/// One host's plugin output as stored in the dump file.
///
/// Field names follow the dump format shared by the `dump` and `report`
/// stages, so a snapshot written by one run can be re-rendered later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    /// 1-based position assigned while aggregating
    #[serde(rename = "ID")]
    pub id: usize,

    #[serde(rename = "IP")]
    pub ip: String,

    #[serde(rename = "MAC", default)]
    pub mac: Option<String>,

    #[serde(rename = "DNS")]
    pub dns: String,

    #[serde(rename = "REPO")]
    pub repository_name: String,

    /// Written as epoch seconds; older dumps carry them as a string
    #[serde(rename = "L_SEEN", default, with = "lenient_ts_seconds")]
    pub last_seen: Option<DateTime<Utc>>,

    /// Plugin output, one entry per line
    #[serde(rename = "CONTENT")]
    pub content: Vec<String>,
}

impl HostRecord {
    /// Build a record from one raw analysis result returned by the platform.
    ///
    /// `index` is the 0-based position in the platform response and is used
    /// both for error reporting and to derive the 1-based record id.
    pub fn from_raw(index: usize, raw: &Value) -> Result<Self> {
        let ip = required_str(raw, index, "ip")?;
        let dns = required_str(raw, index, "dnsName")?;
        let repository_name = raw
            .get("repository")
            .and_then(|repo| repo.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(ReportError::MalformedRecord {
                index,
                field: "repository.name",
            })?;
        let plugin_text = required_str(raw, index, "pluginText")?;

        let mac = raw
            .get("macAddress")
            .and_then(Value::as_str)
            .filter(|mac| !mac.is_empty())
            .map(str::to_owned);

        Ok(Self {
            id: index + 1,
            ip,
            mac,
            dns,
            repository_name,
            last_seen: parse_last_seen(raw, index)?,
            content: plugin_text.split('\n').map(str::to_owned).collect(),
        })
    }
}

fn required_str(raw: &Value, index: usize, field: &'static str) -> Result<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(ReportError::MalformedRecord { index, field })
}

/// `lastSeen` arrives as epoch seconds, usually string-encoded. Absent or
/// empty values mean the platform has no sighting on record.
fn parse_last_seen(raw: &Value, index: usize) -> Result<Option<DateTime<Utc>>> {
    parse_epoch(raw.get("lastSeen")).ok_or(ReportError::MalformedRecord {
        index,
        field: "lastSeen",
    })
}

/// Epoch seconds given as a number or a numeric string.
///
/// Returns `Some(None)` for a missing, null or blank value and `None` when
/// the value is not a usable timestamp.
fn parse_epoch(value: Option<&Value>) -> Option<Option<DateTime<Utc>>> {
    let seconds = match value {
        None | Some(Value::Null) => return Some(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Some(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok()?,
        Some(Value::Number(n)) => n.as_i64()?,
        Some(_) => return None,
    };

    DateTime::from_timestamp(seconds, 0).map(Some)
}

/// Dump-file codec for `L_SEEN`: writes integer seconds, reads integers or
/// numeric strings.
mod lenient_ts_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub use chrono::serde::ts_seconds_option::serialize;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        super::parse_epoch(value.as_ref())
            .ok_or_else(|| D::Error::custom("L_SEEN must be epoch seconds as a number or numeric string"))
    }
}
