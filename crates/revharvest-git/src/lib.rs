//! Git process layer for revharvest.
//!
//! This crate provides Git access through the `git` command line:
//! - Process execution behind the [`ProcessRunner`] trait
//! - The argument vectors of every Git call the extractor makes
//! - [`GitCli`]: commit listing and per-commit retrieval

mod cli;
mod commands;
mod error;
mod process;

pub use cli::GitCli;
pub use commands::{DEFAULT_CONTEXT_LINES, DEFAULT_PROGRAM, GitCommands};
pub use error::{GitError, GitResult};
pub use process::{ProcessOutput, ProcessRunner, SystemProcessRunner};
