//! Command-line interface definitions.
//!
//! This module defines the CLI structure using clap, including all commands
//! and their arguments.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audiostat")]
#[command(about = "Statistics for directories of audio files")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read settings from this TOML file instead of ~/.config/audiostat/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan files and directories and print mimetype, ID3 version and bitrate statistics
    Stats {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Do not print a dot per tagged audio file while scanning
        #[arg(long)]
        no_progress: bool,
    },
}
