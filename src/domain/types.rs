//! Core domain types shared by the validators and the merger.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DriverError;

/// Server image architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Arm,
    X86,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm => "arm",
            Architecture::X86 => "x86",
        }
    }
}

impl FromStr for Architecture {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arm" => Ok(Architecture::Arm),
            "x86" => Ok(Architecture::X86),
            other => Err(DriverError::UnknownArchitecture(other.to_string())),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which label list an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Server,
    Key,
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelKind::Server => f.write_str("server"),
            LabelKind::Key => f.write_str("key"),
        }
    }
}

/// Step of the YAML merge that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    ParseFirst,
    ParseSecond,
    Emit,
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStage::ParseFirst => f.write_str("unmarshal first"),
            MergeStage::ParseSecond => f.write_str("unmarshal second"),
            MergeStage::Emit => f.write_str("marshal merged"),
        }
    }
}
