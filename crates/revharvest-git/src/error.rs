//! Git error types.

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be run.
    #[error("git is not available ({program}): {stderr}")]
    Unavailable {
        /// The program that was probed.
        program: String,
        /// Captured standard error of the probe.
        stderr: String,
    },

    /// Listing the commit identifiers failed.
    #[error("listing commits failed: {0}")]
    ListingFailed(String),

    /// The commit log was empty.
    #[error("no commits found")]
    EmptyLog,
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
