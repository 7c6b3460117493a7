//! Domain layer containing the driver's core logic.
//!
//! This module contains:
//! - The driver configuration record and its flag validators
//! - Flag names, defaults, and the options interface
//! - The cloud-init YAML merger
//! - Logger setup

mod driver;
mod error;
pub mod flags;
pub mod logger;
mod options;
mod types;
pub mod yaml_merge;

pub use driver::Driver;
pub use options::{FlagMap, FlagValue};
pub use yaml_merge::merge_yaml_docs;

#[cfg(test)]
pub use options::DriverOptions;
