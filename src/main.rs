// src/main.rs
use clap::Parser;

use audiostat::cli::{Args, Commands};
use audiostat::command::handle_stats;
use audiostat::config::Config;
use audiostat::log::init_logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.verbose);

    // Load configuration
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Stats { paths, no_progress } => {
            handle_stats(&paths, !no_progress, &config)?;
        }
    }

    Ok(())
}
