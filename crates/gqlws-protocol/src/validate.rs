//! Argument checks shared by the client message constructors.
//!
//! JSON `null` counts as "not given" for optional arguments, so a caller
//! forwarding an absent field from decoded JSON gets the default.

use serde_json::{Map, Value};

use crate::ProtocolError;

/// Requires a non-empty string.
pub(crate) fn non_empty(
    field: &'static str,
    value: String,
) -> Result<String, ProtocolError> {
    if value.is_empty() {
        return Err(ProtocolError::invalid(field, "must be a non-empty string"));
    }
    Ok(value)
}

/// Accepts an absent value or a JSON object; absent becomes `{}`.
///
/// Only a JSON object passes. Arrays are refused like any other
/// non-object, even where a loosely typed client would let them through.
pub(crate) fn optional_object(
    field: &'static str,
    value: Option<Value>,
) -> Result<Map<String, Value>, ProtocolError> {
    match value {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ProtocolError::invalid(
            field,
            format!("expected an object, got {}", json_kind(&other)),
        )),
    }
}

/// Accepts an absent value or a JSON string; absent becomes `""`.
pub(crate) fn optional_string(
    field: &'static str,
    value: Option<Value>,
) -> Result<String, ProtocolError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ProtocolError::invalid(
            field,
            format!("expected a string, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
