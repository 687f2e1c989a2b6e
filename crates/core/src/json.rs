//! Fail-soft parsing for the JSON strings stored alongside blocks and sections.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parse `raw` into `T`, falling back to `T::default()` when the string is
/// empty, whitespace, `null` or malformed.
pub fn parse_or_default<T>(raw: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return T::default();
    }
    match serde_json::from_str::<Option<T>>(trimmed) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            tracing::debug!("falling back to default for malformed JSON: {err}");
            T::default()
        }
    }
}

/// Parse a JSON object, treating anything else as an empty object.
pub fn parse_object(raw: &str) -> Map<String, Value> {
    match parse_or_default::<Value>(raw) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Whether `raw` is empty or a JSON object. Used to validate admin input
/// before it is stored.
pub fn is_object_or_empty(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || matches!(serde_json::from_str::<Value>(trimmed), Ok(Value::Object(_)))
}
