//! Conversion between plain JSON and Firestore REST typed values.
//!
//! Firestore wraps every field in a one-key object naming its type, e.g.
//! `{"stringValue": "x"}`. Integers travel as decimal strings.

use super::{StoreError, StoreResult};
use serde_json::{json, Map, Number, Value};

/// Encodes a JSON object as a Firestore document body (`{"fields": ...}`).
pub(crate) fn encode_document(document: &Value) -> StoreResult<Value> {
    let Value::Object(fields) = document else {
        return Err(StoreError::InvalidDocument(
            "document must be a JSON object".to_string(),
        ));
    };
    Ok(json!({ "fields": encode_fields(fields)? }))
}

/// Decodes a Firestore document body back into a plain JSON object.
pub(crate) fn decode_document(body: &Value) -> StoreResult<Value> {
    match body.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
        Some(other) => Err(StoreError::InvalidDocument(format!(
            "`fields` must be an object, got {other}"
        ))),
        // Firestore omits `fields` entirely for empty documents.
        None => Ok(Value::Object(Map::new())),
    }
}

fn encode_fields(fields: &Map<String, Value>) -> StoreResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), encode_value(value)?)))
        .collect()
}

fn encode_value(value: &Value) -> StoreResult<Value> {
    let encoded = match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                json!({ "integerValue": int.to_string() })
            } else if number.is_u64() {
                // integerValue is a signed 64-bit field.
                return Err(StoreError::InvalidDocument(format!(
                    "integer {number} does not fit a signed 64-bit value"
                )));
            } else {
                json!({ "doubleValue": number })
            }
        }
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => {
            let values = items
                .iter()
                .map(encode_value)
                .collect::<StoreResult<Vec<_>>>()?;
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields)? } }),
    };
    Ok(encoded)
}

fn decode_fields(fields: &Map<String, Value>) -> StoreResult<Map<String, Value>> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode_value(value)?)))
        .collect()
}

fn decode_value(value: &Value) -> StoreResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|object| object.iter().next()) else {
        return Err(StoreError::InvalidDocument(format!(
            "expected a typed value, got {value}"
        )));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| invalid(kind, inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(text) => text.parse::<i64>().ok(),
                Value::Number(number) => number.as_i64(),
                _ => None,
            };
            parsed
                .map(|int| Value::Number(int.into()))
                .ok_or_else(|| invalid(kind, inner))
        }
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(kind, inner)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(|| invalid(kind, inner)),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(items)) => items
                .iter()
                .map(decode_value)
                .collect::<StoreResult<Vec<_>>>()
                .map(Value::Array),
            None => Ok(Value::Array(Vec::new())),
            Some(_) => Err(invalid(kind, inner)),
        },
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            None => Ok(Value::Object(Map::new())),
            Some(_) => Err(invalid(kind, inner)),
        },
        other => Err(StoreError::InvalidDocument(format!(
            "unsupported value type `{other}`"
        ))),
    }
}

fn invalid(kind: &str, inner: &Value) -> StoreError {
    StoreError::InvalidDocument(format!("malformed {kind}: {inner}"))
}
