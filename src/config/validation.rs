//! Configuration validation.

use anyhow::{bail, Result};
use regex::Regex;

use super::Config;
use crate::domain::flags::{flag_kind, FlagKind};
use crate::domain::FlagValue;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    let flag_name = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$")?;

    for (name, value) in config.flags.iter() {
        if !flag_name.is_match(name) {
            bail!(
                "flags: key '{}' must be a flag name without leading dashes, e.g. 'hetzner-image'",
                name
            );
        }

        let Some(kind) = flag_kind(name) else {
            bail!("flags: unknown driver flag '{}'", name);
        };

        let matches_kind = matches!(
            (kind, value),
            (FlagKind::String, FlagValue::String(_))
                | (FlagKind::Bool, FlagValue::Bool(_))
                | (FlagKind::Int, FlagValue::Int(_))
                | (FlagKind::StringSlice, FlagValue::StringSlice(_))
        );
        if !matches_kind {
            bail!(
                "flags['{}']: expected {}",
                name,
                match kind {
                    FlagKind::String => "a string",
                    FlagKind::Bool => "a boolean",
                    FlagKind::Int => "an integer",
                    FlagKind::StringSlice => "a list of strings",
                }
            );
        }
    }

    Ok(())
}
