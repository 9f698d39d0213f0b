//! Core library for revharvest.
//!
//! This crate extracts commits from Git repositories and hands them to an
//! analyzer through a bounded [`CommitQueue`].

mod commit_list;
mod error;
mod extractor;
mod queue;

pub use commit_list::{parse_commit_list, read_commit_list};
pub use error::{CoreError, CoreResult};
pub use extractor::{CommitExtractor, ExtractionSummary};
pub use queue::{CloseOnDrop, CommitQueue, PutError, QueueError, QueueState, TryPutError};
