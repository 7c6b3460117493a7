//! Driver flag processing service.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::DriverArgs;
use crate::config::Config;
use crate::domain::{merge_yaml_docs, Driver, FlagMap};

/// Service that turns command line flags into a validated driver.
pub struct DriverService {
    config: Config,
}

impl DriverService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Command line flags layered over the config file's `[flags]` defaults.
    pub fn options(&self, args: &DriverArgs) -> FlagMap {
        let options = args.to_flag_map().layered_over(&self.config.flags);
        debug!(
            flags = ?options.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            "Collected driver flags"
        );
        options
    }

    /// Build and validate the driver from flags.
    pub fn build(&self, args: &DriverArgs) -> Result<Driver> {
        let options = self.options(args);
        let driver = Driver::from_options(&options).context("Invalid driver flags")?;
        info!(
            deprecated_flags = driver.uses_deprecated_flags(),
            "Driver flags validated"
        );
        Ok(driver)
    }

    /// Validate flags and render the resolved configuration as pretty JSON.
    pub fn check(&self, args: &DriverArgs) -> Result<String> {
        let driver = self.build(args)?;
        serde_json::to_string_pretty(&driver).context("Failed to serialize driver configuration")
    }

    /// Validate flags and return the effective cloud-init user data.
    pub fn user_data(&self, args: &DriverArgs) -> Result<String> {
        let driver = self.build(args)?;
        Ok(driver.user_data()?)
    }

    /// Merge two cloud-init files, the second one taking precedence.
    pub fn merge_files(first: &Path, second: &Path) -> Result<String> {
        let doc1 = fs::read_to_string(first)
            .with_context(|| format!("Failed to read {}", first.display()))?;
        let doc2 = fs::read_to_string(second)
            .with_context(|| format!("Failed to read {}", second.display()))?;

        merge_yaml_docs(&doc1, &doc2).with_context(|| {
            format!(
                "Failed to merge {} into {}",
                second.display(),
                first.display()
            )
        })
    }
}
