//! JSON source adapter.
//!
//! Expected input: an object with a `fields` array of flat records, e.g.
//! `{"fields": [{"D1": "a", "M1": 1}, {"D1": "b", "M1": 2}]}`.
//!
//! Records are pivoted into columns: every key of every record appends one value to the
//! column of that name.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{NormalizedTable, Value};

#[derive(Debug, Deserialize)]
struct FieldsDocument {
    fields: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Load a JSON file into a [`NormalizedTable`].
pub fn load_json_from_path(path: impl AsRef<Path>) -> ReconcileResult<NormalizedTable> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load JSON from an in-memory string into a [`NormalizedTable`].
pub fn load_json_from_str(input: &str) -> ReconcileResult<NormalizedTable> {
    if input.trim().is_empty() {
        return Err(ReconcileError::SourceFormat {
            message: "json input is empty".to_string(),
        });
    }

    let doc: FieldsDocument = serde_json::from_str(input)?;

    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
    for (idx0, record) in doc.fields.iter().enumerate() {
        let record_num = idx0 + 1;
        for (key, jv) in record {
            let value = convert_json_scalar(record_num, key, jv)?;
            match columns.iter_mut().find(|(name, _)| name == key) {
                Some((_, values)) => values.push(value),
                None => columns.push((key.clone(), vec![value])),
            }
        }
    }

    NormalizedTable::new(columns)
}

fn convert_json_scalar(record: usize, key: &str, v: &serde_json::Value) -> ReconcileResult<Value> {
    match v {
        serde_json::Value::Null => Ok(Value::Text(String::new())),
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::Text(b.to_string())),
        serde_json::Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Text(n.to_string()),
        }),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(ReconcileError::SourceFormat {
                message: format!("record {record} field '{key}' is not a scalar"),
            })
        }
    }
}
