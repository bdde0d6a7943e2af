use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::matrix::{LINE_BREAK, ResultMatrix};
use crate::records::HostRecord;

pub const HOST_INFO_LABEL: &str = "Host Info:";
pub const PLUGIN_OUTPUT_LABEL: &str = "Plugin Output:";

/// Labelled grid handed to a renderer: identification column first, then the
/// matrix columns. Row `i` describes host `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One identification cell per host: DNS name, IP and repository.
pub fn host_info(records: &[HostRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            [
                record.dns.as_str(),
                record.ip.as_str(),
                record.repository_name.as_str(),
            ]
            .join(LINE_BREAK)
        })
        .collect()
}

/// Matrix column labels: the search terms verbatim, or a single plugin
/// output column when no terms were given.
pub fn column_labels(terms: &[String]) -> Vec<String> {
    if terms.is_empty() {
        vec![PLUGIN_OUTPUT_LABEL.to_string()]
    } else {
        terms.to_vec()
    }
}

/// Prepend the identification column to the matrix.
pub fn assemble(
    matrix: ResultMatrix,
    host_info: Vec<String>,
    column_labels: Vec<String>,
) -> Result<ReportTable> {
    if host_info.len() != matrix.row_count() {
        return Err(ReportError::RowCountMismatch {
            host_rows: host_info.len(),
            matrix_rows: matrix.row_count(),
        });
    }
    if column_labels.len() != matrix.column_count() {
        return Err(ReportError::ColumnCountMismatch {
            labels: column_labels.len(),
            matrix_columns: matrix.column_count(),
        });
    }

    let labels = std::iter::once(HOST_INFO_LABEL.to_string())
        .chain(column_labels)
        .collect();

    let rows = host_info
        .into_iter()
        .zip(matrix.into_rows())
        .map(|(info, cells)| std::iter::once(info).chain(cells).collect())
        .collect();

    Ok(ReportTable { labels, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;

    fn host(id: usize, ip: &str, lines: &[&str]) -> HostRecord {
        HostRecord {
            id,
            ip: ip.to_string(),
            mac: None,
            dns: format!("host{id}.example.edu"),
            repository_name: "RepoA".to_string(),
            last_seen: None,
            content: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_host_info_joins_dns_ip_repo() {
        let info = host_info(&[host(1, "10.0.0.1", &[])]);
        assert_eq!(info, vec!["host1.example.edu<br>10.0.0.1<br>RepoA"]);
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(column_labels(&[]), vec!["Plugin Output:"]);
        let terms = vec!["ssh".to_string(), String::new(), "curl".to_string()];
        assert_eq!(column_labels(&terms), terms);
    }

    #[test]
    fn test_assemble_full_output() {
        let records = vec![host(1, "10.0.0.1", &["a"]), host(2, "10.0.0.2", &["b"])];
        let matrix = matrix::build(&records, &[], "19506").unwrap();

        let table = assemble(matrix, host_info(&records), column_labels(&[])).unwrap();
        assert_eq!(table.labels, vec!["Host Info:", "Plugin Output:"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[1],
            vec!["host2.example.edu<br>10.0.0.2<br>RepoA".to_string(), "b<br>".to_string()]
        );
    }

    #[test]
    fn test_assemble_search_mode_labels_follow_terms() {
        let records = vec![host(1, "10.0.0.1", &["openssh-server 7.2", "curl 7.50"])];
        let terms = vec!["curl".to_string(), "ssh".to_string()];
        let matrix = matrix::build(&records, &terms, matrix::SOFTWARE_ENUMERATION_PLUGIN).unwrap();

        let table = assemble(matrix, host_info(&records), column_labels(&terms)).unwrap();
        assert_eq!(table.labels, vec!["Host Info:", "curl", "ssh"]);
        assert_eq!(table.rows[0][1], "curl 7.50<br>");
        assert_eq!(table.rows[0][2], "openssh-server 7.2<br>");
    }

    #[test]
    fn test_row_count_mismatch_for_any_sizes() {
        let records: Vec<HostRecord> = (1..=3).map(|i| host(i, "10.0.0.1", &["x"])).collect();
        let matrix = matrix::build(&records, &[], "19506").unwrap();

        for host_rows in [0usize, 1, 2, 4, 7] {
            let info = vec![String::new(); host_rows];
            match assemble(matrix.clone(), info, column_labels(&[])) {
                Err(ReportError::RowCountMismatch {
                    host_rows: got,
                    matrix_rows,
                }) => {
                    assert_eq!(got, host_rows);
                    assert_eq!(matrix_rows, 3);
                }
                other => panic!("expected RowCountMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_column_label_mismatch() {
        let records = vec![host(1, "10.0.0.1", &["x"])];
        let matrix = matrix::build(&records, &[], "19506").unwrap();
        let labels = vec!["a".to_string(), "b".to_string()];

        assert!(matches!(
            assemble(matrix, host_info(&records), labels),
            Err(ReportError::ColumnCountMismatch {
                labels: 2,
                matrix_columns: 1
            })
        ));
    }
}
