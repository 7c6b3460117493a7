//! Flag value access for the driver.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Read access to driver flags.
///
/// Unset flags read as their zero value: empty string, `false`, `0`, or an
/// empty list.
pub trait DriverOptions {
    fn string(&self, key: &str) -> String;

    fn bool(&self, key: &str) -> bool;

    fn int(&self, key: &str) -> i64;

    fn string_slice(&self, key: &str) -> Vec<String>;
}

/// A single flag value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringSlice(Vec<String>),
}

/// Flag values keyed by flag name (without leading dashes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FlagMap {
    values: BTreeMap<String, FlagValue>,
}

impl FlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: FlagValue) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }
}

#[allow(dead_code)]
impl FlagMap {
    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, FlagValue::String(value.into()));
        self
    }

    pub fn with_bool(mut self, key: &str, value: bool) -> Self {
        self.set(key, FlagValue::Bool(value));
        self
    }

    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.set(key, FlagValue::Int(value));
        self
    }

    pub fn with_strings<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.set(key, FlagValue::StringSlice(values));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FlagMap {
    /// Fill in every flag missing from `self` with the value from `defaults`.
    pub fn layered_over(mut self, defaults: &FlagMap) -> Self {
        for (key, value) in &defaults.values {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl DriverOptions for FlagMap {
    fn string(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(FlagValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn bool(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(FlagValue::Bool(true)))
    }

    fn int(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(FlagValue::Int(i)) => *i,
            _ => 0,
        }
    }

    fn string_slice(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(FlagValue::StringSlice(v)) => v.clone(),
            Some(FlagValue::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}
