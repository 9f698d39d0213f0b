//! Commit types for revharvest.
//!
//! This crate provides the commit records handed from extractors to analyzers:
//! - [`Commit`]: A single revision with its header and changed artifacts
//! - [`ChangedArtifact`]: One file touched by a commit
//! - [`parse_commit_text`]: The line-prefix parser building both from raw `git show` output

mod artifact;
mod commit;
mod diff;

pub use artifact::ChangedArtifact;
pub use commit::{Commit, NO_DATE};
pub use diff::{
    DIFF_START_MARKER, HUNK_MARKER, ParsedText, artifact_name, artifact_path, parse_commit_text,
};
