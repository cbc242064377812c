//! Record helpers
//!
//! Control-plane bodies are open JSON maps. These helpers turn decoded
//! bodies into [`Record`]s and pull typed attributes out of them.

use serde_json::Value;

use amqpctl_common::{Params, Record, Result};

/// Decode a single record; an empty body is an empty record
pub fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Null => Ok(Record::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

/// Decode a list of records; an empty body is an empty list
pub fn into_records(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

/// Helper to extract a string attribute
pub fn string_attr<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Helper to extract a bool attribute
pub fn bool_attr(record: &Record, key: &str) -> Option<bool> {
    record.get(key).and_then(Value::as_bool)
}

/// Create a record with the given attributes
pub fn make_record(attrs: Vec<(&str, Value)>) -> Record {
    attrs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Keep only the listed keys, skipping nulls
pub fn retain_attrs(params: &Params, keys: &[&str]) -> Params {
    params
        .iter()
        .filter(|(key, value)| keys.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
