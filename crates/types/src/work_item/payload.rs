//! Decoding of work-item payload documents.
//!
//! Payloads arrive either as JSON objects or as strings that encode one.
//! Both forms normalize to a JSON object map; `null` and blank strings mean
//! "no payload".

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Normalize a raw payload value into an object map.
pub fn decode_payload(raw: Value) -> Result<Option<Map<String, Value>>, PayloadError> {
    match raw {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        Value::String(text) => {
            if text.trim().is_empty() {
                return Ok(None);
            }
            let decoded = serde_json::from_str::<Value>(&text).map_err(|error| PayloadError::InvalidJson(error.to_string()))?;
            match decoded {
                Value::String(_) => Err(PayloadError::NotAnObject("string")),
                other => decode_payload(other),
            }
        }
        other => Err(PayloadError::NotAnObject(json_kind(&other))),
    }
}

pub(super) fn deserialize_payload<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        Some(value) => decode_payload(value).map_err(D::Error::custom),
        None => Ok(None),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
