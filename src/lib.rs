//! # audiostat - Audio Collection Statistics
//!
//! audiostat walks files and directories and summarises what it finds: how many
//! files there are, how many are audio, how many are hidden, which mimetypes
//! occur, which ID3 tag versions the MP3 files carry, and how their bitrates are
//! distributed.
//!
//! ## Command Line Usage
//!
//! ```bash
//! # Statistics for a music library
//! audiostat stats ~/Music
//!
//! # Several roots, no progress dots, debug logging
//! audiostat stats -vv --no-progress /mnt/music /mnt/podcasts
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use audiostat::config::Config;
//! use audiostat::probe::LoftyProbe;
//! use audiostat::report::render;
//! use audiostat::scanner::scan_paths;
//! use audiostat::stats::Collector;
//! use std::path::PathBuf;
//!
//! fn main() -> color_eyre::Result<()> {
//!     let config = Config::load(None)?;
//!     let mut collector = Collector::new();
//!
//!     scan_paths(&[PathBuf::from("/music")], &config.scan, &LoftyProbe, |facts| {
//!         collector.observe(&facts)
//!     })?;
//!
//!     print!("{}", render(&collector.finish()));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line argument parsing
//! - [`command`]: The `stats` command workflow
//! - [`config`]: Configuration loading
//! - [`error`]: Error types
//! - [`log`]: Diagnostic logging setup
//! - [`mimetype`]: Mimetype detection
//! - [`probe`]: Audio metadata probing
//! - [`report`]: Report rendering
//! - [`scanner`]: File system scanning
//! - [`stats`]: Counters and classification
//! - [`tui`]: Terminal output helpers

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod log;
pub mod mimetype;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use error::StatsError;
pub use stats::{AudioFileFacts, Collector, RunCounters};
