//! Parse command.

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use revharvest_config::OutputFormat;
use revharvest_core::{CommitExtractor, CommitQueue};

use crate::output::{OutputFormatArg, print_commits};

/// Arguments for the parse command.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// File holding raw `git show` output (reads stdin if omitted)
    pub file: Option<PathBuf>,

    /// Output format (overrides the configuration)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormatArg>,
}

/// Runs the parse command.
pub fn run(args: &ParseArgs) -> Result<()> {
    let config = super::load_config()?;
    let format = args.format.map_or(config.output.format, OutputFormat::from);

    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            raw
        }
    };

    // A single commit never exceeds the capacity, so no consumer thread is needed
    let queue = Arc::new(CommitQueue::new(config.queue.capacity)?);
    queue.open()?;
    let extractor = CommitExtractor::from_config(&config, Arc::clone(&queue))
        .context("failed to set up commit extraction")?;

    let result = extractor.extract_raw(&raw);
    queue.close();
    result.context("failed to parse commit text")?;

    print_commits(&queue, format, &mut io::stdout().lock()).context("failed to write commit")?;
    Ok(())
}
