//! Common utilities for report rendering

use crate::matrix::LINE_BREAK;

/// HTML escape a string for safe inclusion in HTML
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escape cell text while keeping the line-break markers as real `<br>` tags.
pub fn html_cell(cell: &str) -> String {
    cell.split(LINE_BREAK)
        .map(html_escape)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Turn line-break markers into newlines for plain-text formats.
pub fn plain_cell(cell: &str) -> String {
    let text = cell.replace(LINE_BREAK, "\n");
    match text.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
