//! Extract command.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use revharvest_config::OutputFormat;
use revharvest_core::{CommitExtractor, CommitQueue, read_commit_list};
use tracing::{info, warn};

use crate::output::{OutputFormatArg, print_commits};

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Repository to extract from
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Extract only the commits listed in this file (one identifier per line)
    #[arg(short, long)]
    pub commits: Option<PathBuf>,

    /// Output format (overrides the configuration)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Queue capacity (overrides the configuration)
    #[arg(long)]
    pub capacity: Option<usize>,
}

/// Runs the extract command.
pub fn run(args: &ExtractArgs) -> Result<()> {
    let mut config = super::load_config()?;
    if let Some(capacity) = args.capacity {
        config.queue.capacity = capacity;
    }
    config.validate().context("invalid configuration")?;
    let format = args.format.map_or(config.output.format, OutputFormat::from);

    let selected = args
        .commits
        .as_deref()
        .map(|path| {
            read_commit_list(path)
                .with_context(|| format!("failed to read commit list {}", path.display()))
        })
        .transpose()?;

    let queue = Arc::new(CommitQueue::new(config.queue.capacity)?);
    queue.open()?;
    let extractor = CommitExtractor::from_config(&config, Arc::clone(&queue))
        .context("failed to set up commit extraction")?;

    let (extraction, printed) = thread::scope(|scope| {
        let producer = scope.spawn(|| {
            let _close = extractor.queue().close_on_drop();
            match &selected {
                Some(ids) => extractor.extract_selected(&args.repo, ids.as_slice()),
                None => extractor.extract_all(&args.repo),
            }
        });

        let printed = print_commits(&queue, format, &mut io::stdout().lock());
        if printed.is_err() {
            // Releases a producer blocked on a full queue
            queue.close();
        }
        (producer.join(), printed)
    });

    let summary = extraction
        .map_err(|_| anyhow!("extraction thread panicked"))?
        .context("extraction failed")?;
    let printed = printed.context("failed to write commits")?;

    if !summary.is_complete() {
        warn!(skipped = ?summary.skipped, "some commits could not be extracted");
    }
    info!(printed, "{summary}");

    Ok(())
}
