//! stepprune CLI

use anyhow::{Context, Result};
use clap::Parser;
use cli_lib::{config, run, Cli, Settings};
use stepprune_journal::StdinConfirm;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", config::example_config());
        return Ok(());
    }

    // Initialize tracing
    cli_lib::init_tracing(cli.verbose);

    let file_config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let search_root = std::env::current_dir().context("Failed to get current directory")?;
    let settings = Settings::merge(file_config, &cli, search_root).context("Invalid settings")?;

    run(&settings, &mut StdinConfirm)?;

    Ok(())
}
