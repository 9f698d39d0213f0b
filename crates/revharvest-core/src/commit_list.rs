//! Commit list files for selective extraction.

use std::path::Path;

use tracing::debug;

use crate::CoreResult;

/// Reads a commit list file: one identifier per line.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_commit_list(path: impl AsRef<Path>) -> CoreResult<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let ids = parse_commit_list(&content);
    debug!(?path, count = ids.len(), "read commit list");
    Ok(ids)
}

/// Parses commit list text. Blank lines and `#` comments are skipped.
pub fn parse_commit_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
