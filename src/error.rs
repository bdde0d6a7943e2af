//! Error taxonomy for the dump/report pipeline
//!
//! Domain operations return [`ReportError`]; the CLI layer wraps these in
//! `anyhow` with context and decides which ones end the run cleanly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The platform rejected the supplied credentials. Never retried.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The filtered query produced no records.
    #[error("no data found for the requested selection")]
    EmptyResult,

    /// One or more requested repositories are not in the platform catalog.
    #[error("unknown repositories: {}", .0.join(", "))]
    RepositoryNotFound(Vec<String>),

    /// Host identification column and result matrix disagree on row count.
    #[error("row count mismatch: {host_rows} host rows vs {matrix_rows} matrix rows")]
    RowCountMismatch {
        host_rows: usize,
        matrix_rows: usize,
    },

    /// Column labels do not line up with the matrix columns.
    #[error("column count mismatch: {labels} labels vs {matrix_columns} matrix columns")]
    ColumnCountMismatch {
        labels: usize,
        matrix_columns: usize,
    },

    /// A raw record from the platform lacks a field the dump requires.
    #[error("record {index} is missing field '{field}'")]
    MalformedRecord { index: usize, field: &'static str },

    /// Search terms were given for a plugin with no term-matching strategy.
    #[error("plugin {0} has no search strategy; run without a search list")]
    UnsupportedReportKind(String),

    #[error("missing credentials: {0} must be configured")]
    MissingCredentials(&'static str),

    /// Any non-authentication error reported by the platform API.
    #[error("platform API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_details() {
        let err = ReportError::RowCountMismatch {
            host_rows: 2,
            matrix_rows: 3,
        };
        assert_eq!(
            err.to_string(),
            "row count mismatch: 2 host rows vs 3 matrix rows"
        );

        let err = ReportError::RepositoryNotFound(vec!["Ghost".into(), "Lab".into()]);
        assert_eq!(err.to_string(), "unknown repositories: Ghost, Lab");

        let err = ReportError::MalformedRecord {
            index: 4,
            field: "pluginText",
        };
        assert!(err.to_string().contains("pluginText"));
    }
}
