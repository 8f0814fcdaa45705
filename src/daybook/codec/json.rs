use super::invalid;
use crate::error::Result;
use crate::model::Record;
use serde_json::Value;

/// Accepts `[record, ...]` or `{"records": [record, ...], ...}`.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let payload: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;

    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("records") {
            Some(Value::Array(items)) => items,
            _ => return Err(invalid("Invalid file format")),
        },
        _ => return Err(invalid("Invalid file format")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Record>(item)
                .map_err(|e| invalid(format!("record {}: {}", i + 1, e)))
        })
        .collect()
}
