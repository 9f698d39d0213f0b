//! Core error types.

use thiserror::Error;

use crate::queue::PutError;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git could not be used at all; no extractor was created.
    #[error("extractor setup failed: {0}")]
    Setup(#[source] revharvest_git::GitError),

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] revharvest_git::GitError),

    /// A commit could not be handed to the queue.
    #[error("cannot enqueue commit {id}: {source}")]
    Enqueue {
        /// The identifier of the refused commit.
        id: String,
        /// Why the queue refused it.
        #[source]
        source: PutError,
    },

    /// Raw commit text does not start with `commit <id>`.
    #[error("malformed commit text: {0}")]
    MalformedCommit(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
