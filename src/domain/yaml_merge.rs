//! Cloud-init YAML document merging.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::error::{DriverError, Result};
use super::types::MergeStage;

/// Marker cloud-init expects on the first line of a cloud-config document.
pub const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

/// Merge `doc2` into `doc1` and render the result as a cloud-config document.
///
/// Nested mappings merge key by key, sequences under the same key are
/// concatenated (`doc1` entries first), and every other value from `doc2`
/// replaces the one in `doc1`. Comments do not survive the round trip, so
/// the `#cloud-config` header is prepended when the output lacks it.
///
/// # Errors
///
/// Returns an error if either document is not valid YAML, if its top level
/// is not a mapping, or if the merged mapping cannot be serialized.
pub fn merge_yaml_docs(doc1: &str, doc2: &str) -> Result<String> {
    let mut merged = parse_mapping(doc1, MergeStage::ParseFirst)?;
    let overlay = parse_mapping(doc2, MergeStage::ParseSecond)?;

    merge_mappings(&mut merged, overlay);

    let mut result =
        serde_yaml::to_string(&Value::Mapping(merged)).map_err(|source| DriverError::Yaml {
            stage: MergeStage::Emit,
            source,
        })?;

    if !result.trim().starts_with(CLOUD_CONFIG_HEADER) {
        result = format!("{}\n{}", CLOUD_CONFIG_HEADER, result);
    }

    debug!(bytes = result.len(), "Merged cloud-config documents");
    Ok(result)
}

/// Recursively merge `src` into `dst`.
pub fn merge_mappings(dst: &mut Mapping, src: Mapping) {
    for (key, incoming) in src {
        let incoming = match (dst.get_mut(&key), incoming) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                merge_mappings(existing, incoming);
                continue;
            }
            (Some(Value::Sequence(existing)), Value::Sequence(incoming)) => {
                existing.extend(incoming);
                continue;
            }
            (_, incoming) => incoming,
        };
        dst.insert(key, incoming);
    }
}

fn parse_mapping(doc: &str, stage: MergeStage) -> Result<Mapping> {
    if doc.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let yaml_error = move |source| DriverError::Yaml { stage, source };

    // Only the first document of a stream is merged
    let Some(document) = serde_yaml::Deserializer::from_str(doc).next() else {
        return Ok(Mapping::new());
    };
    let mut value = Value::deserialize(document).map_err(yaml_error)?;
    value.apply_merge().map_err(yaml_error)?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(DriverError::NotAMapping { stage }),
    }
}
