//! Software enumeration matching
//!
//! The software enumeration plugin lists one installed package per line, so a
//! cell is simply every line that mentions the search term.

use super::{LINE_BREAK, ResultMatrix};
use crate::records::HostRecord;

/// Fill one cell per (host, term) with every content line containing the
/// term, compared case-insensitively as a plain substring.
pub fn match_software(records: &[HostRecord], terms: &[String]) -> ResultMatrix {
    let needles: Vec<String> = terms.iter().map(|term| term.to_lowercase()).collect();

    let rows = records
        .iter()
        .map(|record| {
            let lowered: Vec<String> = record.content.iter().map(|line| line.to_lowercase()).collect();

            needles
                .iter()
                .map(|needle| {
                    let mut cell = String::new();
                    for (line, lower) in record.content.iter().zip(&lowered) {
                        if lower.contains(needle.as_str()) {
                            cell.push_str(line);
                            cell.push_str(LINE_BREAK);
                        }
                    }
                    cell
                })
                .collect()
        })
        .collect();

    ResultMatrix::from_rows(rows, terms.len())
}
