//! JSON ⇄ Firestore typed-value mapping.
//!
//! Firestore's REST API does not accept plain JSON values; every value is
//! wrapped in a single-key object naming its type, e.g.
//! `{"stringValue":"x"}` or `{"integerValue":"42"}` (integers travel as
//! strings). The relay stores free-form JSON, so both directions are
//! needed: outbound on `add`, inbound on `list`.

use crate::error::{DocStoreError, DocStoreResult};
use rowsync_protocol::Fields;
use serde_json::{json, Map, Value};

/// Wraps a flat field map into Firestore's `fields` object.
pub(crate) fn to_firestore_fields(fields: &Fields) -> Value {
    let wrapped: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), to_firestore_value(value)))
        .collect();
    Value::Object(wrapped)
}

/// Wraps one JSON value into its Firestore typed form.
pub(crate) fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // integers travel as decimal strings
                json!({"integerValue": i.to_string()})
            } else {
                json!({"doubleValue": n})
            }
        }
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({"arrayValue": {"values": values}})
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), to_firestore_value(value)))
                .collect();
            json!({"mapValue": {"fields": fields}})
        }
    }
}

/// Unwraps a Firestore `fields` object back into a flat field map.
pub(crate) fn from_firestore_fields(fields: &Value) -> DocStoreResult<Fields> {
    let Some(map) = fields.as_object() else {
        return Err(DocStoreError::Decode("fields is not an object".into()));
    };
    map.iter()
        .map(|(key, value)| Ok((key.clone(), from_firestore_value(value)?)))
        .collect()
}

/// Unwraps one Firestore typed value back into plain JSON.
pub(crate) fn from_firestore_value(value: &Value) -> DocStoreResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Err(DocStoreError::Decode(format!(
            "not a typed value: {value}"
        )));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(inner.clone()),
        "integerValue" => {
            let digits = inner
                .as_str()
                .ok_or_else(|| DocStoreError::Decode("integerValue is not a string".into()))?;
            let parsed: i64 = digits
                .parse()
                .map_err(|_| DocStoreError::Decode(format!("bad integerValue: {digits}")))?;
            Ok(json!(parsed))
        }
        "doubleValue" => Ok(inner.clone()),
        "stringValue" => Ok(inner.clone()),
        // Store-side types without a JSON equivalent pass through as-is.
        "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let unwrapped: DocStoreResult<Vec<Value>> =
                items.iter().map(from_firestore_value).collect();
            Ok(Value::Array(unwrapped?))
        }
        "mapValue" => {
            let empty = Value::Object(Map::new());
            let fields = inner.get("fields").unwrap_or(&empty);
            Ok(Value::Object(from_firestore_fields(fields)?))
        }
        other => Err(DocStoreError::Decode(format!(
            "unsupported value type: {other}"
        ))),
    }
}
