//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/machine-driver-hetzner/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("machine-driver-hetzner")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // log_path left at the general default means it was not set in the file
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Parse configuration content without touching the filesystem.
    pub fn parse(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        r#"# machine-driver-hetzner configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/machine-driver-hetzner/logs"

# Default driver flag values, keyed by flag name without the leading dashes.
# Values given on the command line or through HETZNER_* environment
# variables take precedence.
[flags]
# "hetzner-image" = "ubuntu-24.04"
# "hetzner-server-type" = "cx22"
# "hetzner-server-location" = "fsn1"
# "hetzner-use-private-network" = true
# "hetzner-networks" = ["my-network"]
# "hetzner-server-label" = ["managed-by=docker-machine"]
"#
        .to_string()
    }
}
