//! Checked field extraction from decoded JSON records.
//!
//! Each accessor either returns the typed field or a [`SchemaError`] naming
//! the record, the field, and the expected vs. actual JSON type.

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// JSON type name used in [`SchemaError`] messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(
    context: &str,
    field: &str,
    expected: &'static str,
    actual: Option<&Value>,
) -> SchemaError {
    SchemaError {
        context: context.to_string(),
        field: field.to_string(),
        expected,
        actual: actual.map_or("missing", json_type_name),
    }
}

pub(crate) fn str_field<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a str, SchemaError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s),
        other => Err(mismatch(context, field, "string", other)),
    }
}

pub(crate) fn bool_field(
    record: &Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<bool, SchemaError> {
    match record.get(field) {
        Some(Value::Bool(b)) => Ok(*b),
        other => Err(mismatch(context, field, "bool", other)),
    }
}

pub(crate) fn array_field<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a [Value], SchemaError> {
    match record.get(field) {
        Some(Value::Array(items)) => Ok(items),
        other => Err(mismatch(context, field, "array", other)),
    }
}

pub(crate) fn object_field<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a Map<String, Value>, SchemaError> {
    match record.get(field) {
        Some(Value::Object(map)) => Ok(map),
        other => Err(mismatch(context, field, "object", other)),
    }
}

/// Interpret an element (array item or map value) as an object.
pub(crate) fn as_record<'a>(
    value: &'a Value,
    field: &str,
    context: &str,
) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| mismatch(context, field, "object", Some(value)))
}
