//! Line-oriented input files
//!
//! Search terms are taken verbatim, one per line: a blank line is an empty
//! term (which matches every line of output). Repository and host lists are
//! trimmed and skip blank lines.

use anyhow::{Context, Result};
use std::path::Path;

/// Read a search-term file, one term per line, no escaping.
pub fn read_terms(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read search list: {}", path.display()))?;
    Ok(split_terms(&content))
}

/// Read a list of repository names or host addresses.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn split_terms(content: &str) -> Vec<String> {
    content.lines().map(str::to_owned).collect()
}
