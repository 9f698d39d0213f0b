//! Line-prefix parser for raw commit text.
//!
//! The input is the output of `git show -U<n> --no-renames <id>`: a commit
//! header followed by one `diff --git` section per changed file. Sections are
//! delimited only by the two markers below; no other diff syntax is
//! interpreted.

use crate::ChangedArtifact;

/// Prefix of the first line of every per-file diff section.
pub const DIFF_START_MARKER: &str = "diff --git";

/// Prefix of the line closing a section's diff header.
pub const HUNK_MARKER: &str = "@@";

/// Minimum token count of a usable section header: `diff`, `--git`, `a/...`, `b/...`.
const MIN_MARKER_TOKENS: usize = 4;

/// Header and changed artifacts split out of one commit's raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    /// Lines before the first diff section, or all lines if there is none.
    pub header: Vec<String>,

    /// Changed artifacts in order of appearance; `None` if no diff section exists.
    pub artifacts: Option<Vec<ChangedArtifact>>,
}

/// Parses the raw text of one commit.
///
/// Never fails: text without any `diff --git` line becomes a header-only
/// result, and unparseable section headers yield artifacts with empty paths.
///
/// The first line always belongs to the header, even if it starts with the
/// marker, since raw commit text opens with `commit <id>`.
pub fn parse_commit_text(text: &str) -> ParsedText {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(first_section) = lines
        .iter()
        .skip(1)
        .position(|line| line.starts_with(DIFF_START_MARKER))
        .map(|offset| offset + 1)
    else {
        return ParsedText {
            header: to_owned_lines(&lines),
            artifacts: None,
        };
    };

    let header = to_owned_lines(&lines[..first_section]);
    let mut artifacts = Vec::new();
    let mut current: Option<ChangedArtifact> = None;
    let mut content_reached = false;

    for line in &lines[first_section..] {
        if line.starts_with(DIFF_START_MARKER) {
            artifacts.extend(current.take());
            current = Some(ChangedArtifact::from_marker_line(line));
            content_reached = false;
            continue;
        }

        // The first line is a marker, so an artifact is always in progress here.
        let Some(artifact) = current.as_mut() else {
            continue;
        };

        if content_reached {
            artifact.push_content_line(line);
        } else {
            artifact.push_diff_header_line(line);
            content_reached = line.starts_with(HUNK_MARKER);
        }
    }
    artifacts.extend(current);

    ParsedText {
        header,
        artifacts: Some(artifacts),
    }
}

/// Extracts the artifact path from a `diff --git a/<path> b/<path>` line.
///
/// Takes the last token starting with `b/` and drops the leading `b`, so
/// `diff --git a/x/y.c b/x/y.c` yields `/x/y.c`. Returns an empty string for
/// lines with fewer than four tokens or without a `b/` token.
pub fn artifact_path(marker_line: &str) -> String {
    let tokens: Vec<&str> = marker_line.split_whitespace().collect();
    if tokens.len() < MIN_MARKER_TOKENS {
        return String::new();
    }

    tokens
        .iter()
        .rev()
        .find(|token| token.starts_with("b/"))
        .map(|token| token[1..].to_string())
        .unwrap_or_default()
}

/// Returns the final segment of an artifact path.
pub fn artifact_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

fn to_owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_string()).collect()
}
