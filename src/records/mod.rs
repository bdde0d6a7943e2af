//! Record store
//!
//! Holds the flat list of host/plugin-output records for one run and owns the
//! dump file that hands them from the `dump` stage to the `report` stage.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

pub mod types;

pub use types::HostRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<HostRecord>,
}

impl RecordStore {
    /// Convert raw platform results into records, numbering them from 1.
    ///
    /// Any malformed entry aborts the whole conversion so that a dump is
    /// never written from a partial result set.
    pub fn from_raw(raw: &[Value]) -> Result<Self> {
        let records = raw
            .iter()
            .enumerate()
            .map(|(index, entry)| HostRecord::from_raw(index, entry))
            .collect::<Result<Vec<_>>>()?;

        debug!(records = records.len(), "Aggregated raw platform results");
        Ok(Self { records })
    }

    /// Read a dump file written by [`RecordStore::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<HostRecord> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), records = records.len(), "Loaded dump file");
        Ok(Self { records })
    }

    /// Serialize every record and write the dump file in one shot.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string(&self.records)?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), records = self.records.len(), "Wrote dump file");
        Ok(())
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use serde_json::json;
    use tempfile::TempDir;

    fn raw_result(ip: &str, text: &str) -> Value {
        json!({
            "ip": ip,
            "macAddress": "00:11:22:33:44:55",
            "dnsName": format!("{ip}.example.edu"),
            "repository": { "id": "7", "name": "RepoA" },
            "lastSeen": "1490000000",
            "pluginText": text,
        })
    }

    #[test]
    fn test_from_raw_assigns_sequential_ids() {
        let raw = vec![
            raw_result("10.0.0.1", "openssh-server 7.2\ncurl 7.50"),
            raw_result("10.0.0.2", "nginx 1.10"),
        ];

        let store = RecordStore::from_raw(&raw).unwrap();
        assert_eq!(store.len(), 2);

        let first = &store.records()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.ip, "10.0.0.1");
        assert_eq!(first.dns, "10.0.0.1.example.edu");
        assert_eq!(first.repository_name, "RepoA");
        assert_eq!(first.mac.as_deref(), Some("00:11:22:33:44:55"));
        assert_eq!(first.last_seen.unwrap().timestamp(), 1_490_000_000);
        assert_eq!(first.content, vec!["openssh-server 7.2", "curl 7.50"]);

        assert_eq!(store.records()[1].id, 2);
    }

    #[test]
    fn test_plugin_text_keeps_trailing_empty_line() {
        let raw = vec![raw_result("10.0.0.1", "a\nb\n")];
        let store = RecordStore::from_raw(&raw).unwrap();
        assert_eq!(store.records()[0].content, vec!["a", "b", ""]);
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let raw = vec![json!({
            "ip": "10.0.0.3",
            "macAddress": "",
            "dnsName": "",
            "repository": { "name": "RepoB" },
            "lastSeen": "",
            "pluginText": "x",
        })];

        let store = RecordStore::from_raw(&raw).unwrap();
        let record = &store.records()[0];
        assert_eq!(record.mac, None);
        assert_eq!(record.last_seen, None);
        assert_eq!(record.dns, "");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let mut broken = raw_result("10.0.0.9", "x");
        broken.as_object_mut().unwrap().remove("pluginText");
        let raw = vec![raw_result("10.0.0.1", "x"), broken];

        match RecordStore::from_raw(&raw) {
            Err(ReportError::MalformedRecord { index, field }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "pluginText");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_repository_name_is_malformed() {
        let mut broken = raw_result("10.0.0.1", "x");
        broken["repository"] = json!({ "id": "1" });

        assert!(matches!(
            RecordStore::from_raw(&[broken]),
            Err(ReportError::MalformedRecord {
                field: "repository.name",
                ..
            })
        ));
    }

    #[test]
    fn test_unparsable_last_seen_is_malformed() {
        let mut broken = raw_result("10.0.0.1", "x");
        broken["lastSeen"] = json!("yesterday");

        assert!(matches!(
            RecordStore::from_raw(&[broken]),
            Err(ReportError::MalformedRecord {
                field: "lastSeen",
                ..
            })
        ));
    }

    #[test]
    fn test_dump_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pluginText.dump");

        let raw = vec![
            raw_result("10.0.0.1", "line one\nline two\n\nline four"),
            raw_result("10.0.0.2", "only"),
        ];
        let store = RecordStore::from_raw(&raw).unwrap();
        store.save(&path).unwrap();

        let loaded = RecordStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.records()[0].content,
            vec!["line one", "line two", "", "line four"]
        );
    }

    #[test]
    fn test_dump_file_uses_uppercase_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pluginText.dump");

        RecordStore::from_raw(&[raw_result("10.0.0.1", "x")])
            .unwrap()
            .save(&path)
            .unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &written[0];
        for key in ["ID", "IP", "MAC", "DNS", "REPO", "L_SEEN", "CONTENT"] {
            assert!(entry.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(entry["L_SEEN"], json!(1_490_000_000));
    }

    #[test]
    fn test_load_accepts_string_encoded_last_seen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pluginText.dump");
        std::fs::write(
            &path,
            r#"[
              {"ID": 1, "IP": "10.0.0.1", "MAC": "", "DNS": "a", "REPO": "RepoA", "L_SEEN": "1490000000", "CONTENT": ["x"]},
              {"ID": 2, "IP": "10.0.0.2", "MAC": null, "DNS": "b", "REPO": "RepoA", "L_SEEN": "", "CONTENT": []},
              {"ID": 3, "IP": "10.0.0.3", "DNS": "c", "REPO": "RepoA", "CONTENT": []}
            ]"#,
        )
        .unwrap();

        let store = RecordStore::load(&path).unwrap();
        let records = store.records();
        assert_eq!(records[0].last_seen.unwrap().timestamp(), 1_490_000_000);
        assert_eq!(records[1].last_seen, None);
        assert_eq!(records[2].last_seen, None);
        assert_eq!(records[2].mac, None);
    }

    #[test]
    fn test_load_rejects_unparsable_last_seen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pluginText.dump");
        std::fs::write(
            &path,
            r#"[{"ID": 1, "IP": "10.0.0.1", "DNS": "a", "REPO": "RepoA", "L_SEEN": "soon", "CONTENT": []}]"#,
        )
        .unwrap();

        assert!(matches!(RecordStore::load(&path), Err(ReportError::Json(_))));
    }
}
