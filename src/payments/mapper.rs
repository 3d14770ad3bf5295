//! Declarative copying of untyped input into typed objects
//!
//! Every nested object is filled the same way: a table of
//! `external key -> field setter` rows applied by [`map_fields`]. A key that
//! is absent or `null` leaves the field at its default.

use crate::payments::error::{ValidationError, ValidationResult};
use serde_json::{Map, Value};

/// One row of a mapping table
pub struct Field<T> {
    /// Key in the untyped input
    pub key: &'static str,
    /// Deserializes the value into the target field
    pub assign: fn(&mut T, Value) -> serde_json::Result<()>,
}

/// Declare a mapping row: `field!("first_name" => first_name)`
///
/// The right-hand side may be a dotted path into nested structs.
macro_rules! field {
    ($key:literal => $($field:ident).+) => {
        $crate::payments::mapper::Field {
            key: $key,
            assign: |target, value| {
                target.$($field).+ = ::serde_json::from_value(value)?;
                Ok(())
            },
        }
    };
}

pub(crate) use field;

/// Copy every present, non-null key of `data` listed in `fields` into `target`
///
/// `path` prefixes the key in error messages (e.g. `payer.contact`).
pub fn map_fields<T>(
    mut target: T,
    fields: &[Field<T>],
    data: &Map<String, Value>,
    path: &str,
) -> ValidationResult<T> {
    for field in fields {
        match data.get(field.key) {
            None | Some(Value::Null) => continue,
            Some(value) => (field.assign)(&mut target, value.clone())
                .map_err(|e| ValidationError::invalid_value(join_path(path, field.key), e))?,
        }
    }

    Ok(target)
}

/// Read `data[key]` as a nested object; `None` when absent or `null`
pub fn nested_object<'a>(
    data: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> ValidationResult<Option<&'a Map<String, Value>>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ValidationError::invalid_value(
            join_path(path, key),
            format!("expected an object, got {}", kind_of(other)),
        )),
    }
}

/// Read `data[key]` as a list of objects; empty when absent or `null`
pub fn nested_list<'a>(
    data: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> ValidationResult<Vec<&'a Map<String, Value>>> {
    let entries = match data.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(ValidationError::invalid_value(
                join_path(path, key),
                format!("expected a list, got {}", kind_of(other)),
            ))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(map) => Ok(map),
            other => Err(ValidationError::invalid_value(
                format!("{}[{}]", join_path(path, key), index),
                format!("expected an object, got {}", kind_of(other)),
            )),
        })
        .collect()
}

pub(crate) fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
