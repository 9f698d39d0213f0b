//! A single file touched by a commit.

use serde::{Deserialize, Serialize};

/// One changed file of a commit, as delimited by a `diff --git` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedArtifact {
    /// Repository-relative path taken from the `b/` side of the section header.
    path: String,

    /// Final segment of `path`.
    name: String,

    /// Section lines from the `diff --git` line up to and including the first `@@` line.
    diff_header: Vec<String>,

    /// Section lines after the first `@@` line.
    content: Vec<String>,
}

impl ChangedArtifact {
    /// Creates an artifact from already split parts.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        diff_header: Vec<String>,
        content: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            diff_header,
            content,
        }
    }

    /// Starts an artifact from the first line of its diff section.
    pub(crate) fn from_marker_line(line: &str) -> Self {
        let path = crate::artifact_path(line);
        let name = crate::artifact_name(&path).to_string();
        Self {
            path,
            name,
            diff_header: vec![line.to_string()],
            content: Vec::new(),
        }
    }

    pub(crate) fn push_diff_header_line(&mut self, line: &str) {
        self.diff_header.push(line.to_string());
    }

    pub(crate) fn push_content_line(&mut self, line: &str) {
        self.content.push(line.to_string());
    }

    /// Returns the repository-relative path; empty if it could not be parsed.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file name; empty if the path is empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the diff header lines.
    pub fn diff_header(&self) -> &[String] {
        &self.diff_header
    }

    /// Returns the content lines.
    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Returns true if the section never reached a hunk, e.g. a mode-only change.
    pub fn is_content_empty(&self) -> bool {
        self.content.is_empty()
    }
}
