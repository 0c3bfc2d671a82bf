//! Expansion of test groups into concrete parameter records

use crate::config::{StructureType, TestGroup};
use itertools::iproduct;
use serde::Serialize;

pub const DEFAULT_KEY_COUNT: u64 = 1000;
pub const DEFAULT_KEY_SIZE: u64 = 16;
pub const DEFAULT_FIELD_COUNT: u64 = 0;
pub const DEFAULT_FIELD_SIZE: u64 = 0;
pub const DEFAULT_VALUE_SIZE: u64 = 64;

/// One point of the sweep
/// Parameters the structure type does not use are `None` and never serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    #[serde(rename = "type")]
    pub structure: StructureType,
    pub key_count: u64,
    pub key_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_size: Option<u64>,
    pub value_size: u64,
}

impl ParameterRecord {
    /// present parameters as (name, value) pairs in invocation order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("type", self.structure.to_string()),
            ("key_count", self.key_count.to_string()),
            ("key_size", self.key_size.to_string()),
        ];

        if let Some(field_count) = self.field_count {
            fields.push(("field_count", field_count.to_string()));
        }
        if let Some(field_size) = self.field_size {
            fields.push(("field_size", field_size.to_string()));
        }

        fields.push(("value_size", self.value_size.to_string()));
        fields
    }
}

/// explicit candidate list or the single default
pub(crate) fn candidates(values: &Option<Vec<u64>>, default: u64) -> Vec<u64> {
    match values {
        Some(values) => values.clone(),
        None => vec![default],
    }
}

/// Cartesian product over key_count, key_size, field_count, field_size, value_size
/// (key_count varies slowest), no deduplication
pub fn expand(group: &TestGroup) -> Vec<ParameterRecord> {
    let uses_fields = group.structure.uses_fields();

    iproduct!(
        candidates(&group.key_counts, DEFAULT_KEY_COUNT),
        candidates(&group.key_sizes, DEFAULT_KEY_SIZE),
        candidates(&group.field_counts, DEFAULT_FIELD_COUNT),
        candidates(&group.field_sizes, DEFAULT_FIELD_SIZE),
        candidates(&group.value_sizes, DEFAULT_VALUE_SIZE)
    )
    .map(
        |(key_count, key_size, field_count, field_size, value_size)| ParameterRecord {
            structure: group.structure,
            key_count,
            key_size,
            field_count: uses_fields.then_some(field_count),
            field_size: uses_fields.then_some(field_size),
            value_size,
        },
    )
    .collect()
}
