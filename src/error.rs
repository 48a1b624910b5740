//! Error types for the statistics core.
//!
//! Per-file problems (unreadable metadata, unknown mimetype) never surface here:
//! they degrade into "not audio" or the `unknown` mimetype. These variants cover
//! the contract errors that must stop a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// A parser reported a tag version outside the fixed known set.
    #[error("Unknown tag version '{0}'\n  Known versions: v1.0, v1.1, v2.2, v2.3, v2.4")]
    UnknownTagVersion(String),

    #[error("Path not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    PathNotFound(PathBuf),

    #[error("Invalid configuration in '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, StatsError>;
