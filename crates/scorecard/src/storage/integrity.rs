use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::scenario::Scenario;

use super::error::StorageError;

/// SHA-256 hex digest of the scenario's canonical JSON (object keys sorted at
/// every level, compact separators). Equal scenarios hash equal; any edit to a
/// stored document changes the digest.
pub fn scenario_hash(scenario: &Scenario) -> Result<String, StorageError> {
    let value = serde_json::to_value(scenario).map_err(|source| StorageError::Serialize {
        id: scenario.id.clone(),
        source,
    })?;
    let canonical = canonicalize(value).to_string();
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
