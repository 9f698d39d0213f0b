//! Initialize command.

use anyhow::{Context, Result, bail};
use clap::Args;
use revharvest_config::{CONFIG_FILE_NAME, Config};

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Runs the init command.
pub fn run(args: &InitArgs) -> Result<()> {
    let path = std::env::current_dir()
        .context("failed to determine current directory")?
        .join(CONFIG_FILE_NAME);

    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let content = format!(
        "# revharvest configuration\n\n{}",
        Config::default().to_toml()?
    );
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
