//! CLI definition.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Extract structured commit records from Git repositories.
#[derive(Debug, Parser)]
#[command(name = "revharvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract commits from a repository
    Extract(commands::extract::ExtractArgs),

    /// Parse one commit from raw `git show` output
    Parse(commands::parse::ParseArgs),

    /// Initialize a new revharvest configuration
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Extract(args) => commands::extract::run(&args),
            Commands::Parse(args) => commands::parse::run(&args),
            Commands::Init(args) => commands::init::run(&args),
        }
    }
}
