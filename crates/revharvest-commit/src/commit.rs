//! Commit record handed from extractors to analyzers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{ChangedArtifact, ParsedText, parse_commit_text};

/// Date used for commits whose committer date was never resolved.
pub const NO_DATE: &str = "<no_date>";

/// Format of `git show -s --format=%ci`, e.g. `2024-03-01 14:02:11 +0100`.
const COMMITTER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A single repository revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The revision identifier, typically an abbreviated hash.
    id: String,

    /// The committer date as printed by git, or [`NO_DATE`].
    date: String,

    /// Lines preceding the first diff section.
    header: Vec<String>,

    /// Changed files; `None` if the raw text had no diff section at all.
    changed_artifacts: Option<Vec<ChangedArtifact>>,
}

impl Commit {
    /// Creates a commit from already parsed parts.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        header: Vec<String>,
        changed_artifacts: Option<Vec<ChangedArtifact>>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            header,
            changed_artifacts,
        }
    }

    /// Builds a commit by parsing the raw `git show` text of one revision.
    #[must_use]
    pub fn parse(id: impl Into<String>, date: impl Into<String>, raw: &str) -> Self {
        let ParsedText { header, artifacts } = parse_commit_text(raw);
        Self::new(id, date, header, artifacts)
    }

    /// Returns the revision identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the committer date string.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the commit header lines.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Returns the changed artifacts, or an empty slice if there was no diff section.
    pub fn changed_artifacts(&self) -> &[ChangedArtifact] {
        self.changed_artifacts.as_deref().unwrap_or_default()
    }

    /// Returns true if the raw text contained at least one diff section.
    ///
    /// Distinguishes "no diff section" from "diff section present", which
    /// [`changed_artifacts`](Self::changed_artifacts) alone cannot.
    pub fn has_diff_section(&self) -> bool {
        self.changed_artifacts.is_some()
    }

    /// Parses the committer date.
    ///
    /// Returns `None` for [`NO_DATE`] or any string not in `%ci` format.
    pub fn committer_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(self.date.trim(), COMMITTER_DATE_FORMAT).ok()
    }

    /// Returns the first line of the commit header (`commit <id> ...`).
    pub fn subject_line(&self) -> &str {
        self.header.first().map_or("", String::as_str)
    }
}
