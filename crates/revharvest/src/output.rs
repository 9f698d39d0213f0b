//! Printing of drained commits.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use revharvest_commit::Commit;
use revharvest_config::OutputFormat;
use revharvest_core::CommitQueue;

/// Output format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// One JSON object per line
    Json,
    /// One line per commit followed by its changed paths
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::Summary => Self::Summary,
        }
    }
}

/// Writes one commit in the given format.
pub fn write_commit(out: &mut impl Write, commit: &Commit, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, commit).context("failed to serialize commit")?;
            writeln!(out)?;
        }
        OutputFormat::Summary => {
            let artifacts = commit.changed_artifacts();
            writeln!(
                out,
                "{} {} ({} changed)",
                commit.id(),
                commit.date(),
                artifacts.len()
            )?;
            for artifact in artifacts {
                writeln!(out, "    {}", artifact.path())?;
            }
        }
    }
    Ok(())
}

/// Prints commits as they are drained until the queue is closed and empty.
///
/// Returns the number of commits printed.
pub fn print_commits(
    queue: &CommitQueue,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<usize> {
    let mut printed = 0;
    for commit in queue.drain() {
        write_commit(out, &commit, format)?;
        printed += 1;
    }
    out.flush()?;
    Ok(printed)
}
