//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::FlagMap;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Default driver flag values, overridden by the command line
    #[serde(default)]
    pub flags: FlagMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            flags: FlagMap::new(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("machine-driver-hetzner")
        })
        .join("logs")
}
