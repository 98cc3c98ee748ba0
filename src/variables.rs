//! Variable payload codec.
//!
//! Builds the `inputCollection` variable document the loader attaches to
//! its completed job, and decodes the variable documents the engine
//! attaches to incoming jobs. The codec itself has no size limit — an
//! oversized collection is rejected by the ENGINE at completion time and
//! surfaces as a gateway error, which callers propagate rather than
//! retry.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;

/// One element of the generated collection.
///
/// Immutable once created; its lifetime ends when it is serialized into
/// a job-completion payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub name: String,
    pub index: u32,
    pub expires_at: DateTime<Utc>,
}

/// The full collection, serialized as one variable named
/// `inputCollection`. Order is insertion order (index ascending) and must
/// be preserved — the engine's multi-instance construct iterates it
/// positionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariablePayload {
    #[serde(rename = "inputCollection")]
    pub input_collection: Vec<VariableRecord>,
}

impl VariablePayload {
    /// Generate `count` records: `name_i`, index `i`, expiring `i`
    /// seconds from now. Pure in `count` and the current time.
    pub fn generate(count: u32) -> Self {
        let now = Utc::now();
        let input_collection = (0..count)
            .map(|i| VariableRecord {
                name: format!("name_{i}"),
                index: i,
                expires_at: now + TimeDelta::seconds(i64::from(i)),
            })
            .collect();
        Self { input_collection }
    }

    /// Encode as the engine's variable document: a JSON object with a
    /// single `inputCollection` entry holding the full sequence.
    pub fn encode(&self) -> Result<Value, CodecError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Generic variable-document view for handlers that only inspect job
/// variables. The only schema enforced is "is a JSON object"; failures
/// are returned to the caller, never swallowed.
pub fn decode(raw: &Value) -> Result<Map<String, Value>, CodecError> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        other => Err(CodecError::NotAnObject {
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_exact_count_in_order() {
        for count in [0u32, 1, 5, 100] {
            let payload = VariablePayload::generate(count);
            assert_eq!(payload.input_collection.len(), count as usize);
            for (i, record) in payload.input_collection.iter().enumerate() {
                assert_eq!(record.index, i as u32);
                assert_eq!(record.name, format!("name_{i}"));
            }
        }
    }

    #[test]
    fn generate_names_are_unique() {
        let payload = VariablePayload::generate(50);
        let mut names: Vec<_> = payload
            .input_collection
            .iter()
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 50);
    }

    #[test]
    fn generate_is_deterministic_in_names_and_indices() {
        let a = VariablePayload::generate(10);
        let b = VariablePayload::generate(10);
        for (ra, rb) in a.input_collection.iter().zip(&b.input_collection) {
            assert_eq!(ra.name, rb.name);
            assert_eq!(ra.index, rb.index);
        }
    }

    #[test]
    fn expiry_ascends_with_index() {
        let payload = VariablePayload::generate(10);
        for pair in payload.input_collection.windows(2) {
            assert!(pair[0].expires_at < pair[1].expires_at);
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let payload = VariablePayload::generate(7);
        let encoded = payload.encode().unwrap();

        let variables = decode(&encoded).unwrap();
        assert_eq!(variables.len(), 1);

        let collection = variables
            .get("inputCollection")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(collection.len(), 7);

        let recovered: VariablePayload = serde_json::from_value(encoded).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn encode_handles_large_collections() {
        // Size limits live in the engine, not here.
        let payload = VariablePayload::generate(5000);
        let encoded = payload.encode().unwrap();
        let collection = encoded["inputCollection"].as_array().unwrap();
        assert_eq!(collection.len(), 5000);
    }

    #[test]
    fn decode_rejects_non_objects() {
        let err = decode(&Value::Array(vec![])).unwrap_err();
        assert!(matches!(err, CodecError::NotAnObject { found: "array" }));
    }

    #[test]
    fn record_serializes_camel_case() {
        let payload = VariablePayload::generate(1);
        let encoded = payload.encode().unwrap();
        let record = &encoded["inputCollection"][0];
        assert!(record.get("expiresAt").is_some());
        assert!(record.get("expires_at").is_none());
    }
}
