//! revharvest CLI - Extract structured commit records from Git repositories.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout carries extracted commits only
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
