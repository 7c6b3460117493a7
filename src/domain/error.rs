//! Error types for the driver.

use std::path::PathBuf;

use thiserror::Error;

use super::types::{LabelKind, MergeStage};

/// Errors raised while building the driver configuration from flags.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Two flags that cannot be combined were both set
    #[error("--{first} and --{second} are mutually exclusive")]
    MutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },

    /// Public networking fully disabled without a private network
    #[error("--{flag} must be used if public networking is disabled (hint: implicitly set by --{hint})")]
    PrivateNetworkRequired {
        flag: &'static str,
        hint: &'static str,
    },

    /// Label entry without a `=` separator
    #[error("{kind} label {label} is not in key=value format")]
    InvalidLabel { kind: LabelKind, label: String },

    /// Architecture value other than `arm` or `x86`
    #[error("unknown architecture {0}")]
    UnknownArchitecture(String),

    /// A mandatory flag was left empty
    #[error("hetzner requires --{0} to be set")]
    MissingFlag(&'static str),

    /// Flag value outside its accepted range
    #[error("invalid value {value} for --{flag}")]
    InvalidValue { flag: &'static str, value: String },

    /// YAML could not be parsed or emitted
    #[error("failed to {stage} YAML: {source}")]
    Yaml {
        stage: MergeStage,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML parsed, but the top level is not a mapping
    #[error("failed to {stage} YAML: expected a mapping at the top level")]
    NotAMapping { stage: MergeStage },

    /// Merging additional user data into the user data file failed
    #[error("failed to merge user data YAML: {0}")]
    MergeUserData(#[source] Box<DriverError>),

    /// User data file could not be read
    #[error("failed to read user data file {}: {source}", path.display())]
    ReadUserData {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
