//! Decoding of Firestore's typed REST value encoding into plain JSON.
//!
//! Every Firestore value is an object with exactly one key naming its type,
//! e.g. `{"stringValue": "Yes"}` or `{"arrayValue": {"values": [...]}}`.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("Unsupported Firestore value: {0}")]
    Unsupported(String),

    #[error("Invalid integerValue '{0}'")]
    InvalidInteger(String),
}

/// Decodes a document's `fields` map.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, ValueError> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

/// Decodes a single typed value.
pub fn decode_value(value: &Value) -> Result<Value, ValueError> {
    let typed = value
        .as_object()
        .filter(|obj| obj.len() == 1)
        .ok_or_else(|| ValueError::Unsupported(value.to_string()))?;

    let (kind, inner) = typed
        .iter()
        .next()
        .ok_or_else(|| ValueError::Unsupported(value.to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "bytesValue"
        | "referenceValue" | "geoPointValue" => Ok(inner.clone()),
        // int64 travels as a decimal string
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ValueError::InvalidInteger(s.clone())),
            Value::Number(_) => Ok(inner.clone()),
            other => Err(ValueError::InvalidInteger(other.to_string())),
        },
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match inner.get("fields") {
                Some(Value::Object(fields)) => decode_fields(fields)?,
                _ => Map::new(),
            };
            Ok(Value::Object(fields))
        }
        other => Err(ValueError::Unsupported(other.to_string())),
    }
}
