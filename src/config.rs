//! Configuration management for audiostat.
//!
//! Settings are read from a TOML file: the one passed with `--config`, or
//! `~/.config/audiostat/config.toml` when it exists. The file is never written;
//! when there is none the built-in defaults apply. Missing keys fall back to
//! their defaults as well.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StatsError;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub ui: UIConfig,
}

/// Directory scanning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory and file names to skip while walking
    pub exclude_patterns: Vec<String>,
    pub follow_links: bool,
}

/// User interface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Print a dot for every tagged audio file while scanning
    pub progress: bool,
    pub color: ColorConfig,
}

/// Color theme configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Theme name: "default", "cyan", "magenta", "yellow", "green", "red", "blue", "white"
    pub theme: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            // Hidden files are counted, so dot-names are not excluded here
            exclude_patterns: vec![
                "System Volume Information".to_string(),
                "$RECYCLE.BIN".to_string(),
            ],
            follow_links: false,
        }
    }
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            progress: true,
            color: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    ///
    /// Typically `~/.config/audiostat/config.toml` on Unix systems or
    /// `%USERPROFILE%/.config/audiostat/config.toml` on Windows.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| color_eyre::eyre::eyre!("Could not determine home directory"))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("audiostat")
            .join("config.toml"))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Config`] naming `origin` if the TOML is malformed.
    pub fn from_toml(contents: &str, origin: &Path) -> crate::error::Result<Self> {
        toml::from_str(contents).map_err(|e| StatsError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its TOML is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_toml(&contents, path)?)
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if a file is present there, and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if file I/O fails or if the TOML is malformed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use audiostat::config::Config;
    ///
    /// # fn main() -> color_eyre::Result<()> {
    /// let config = Config::load(None)?;
    /// println!("Using theme: {}", config.ui.color.theme);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Self::get_config_path() {
            Ok(default_path) if default_path.exists() => Self::load_from(&default_path),
            _ => Ok(Self::default()),
        }
    }
}
