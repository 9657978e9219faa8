//! Wire encoding of typed tables.
//!
//! | dtype      | JSON                                   |
//! |------------|----------------------------------------|
//! | absent     | `null`                                 |
//! | boolean    | `true` / `false`                       |
//! | integer    | number                                 |
//! | float      | number (`null` when not finite)        |
//! | complex    | `"(1.5-2j)"`                           |
//! | datetime   | `"2024-01-01T00:00:00"` (ISO-8601)     |
//! | category   | the label as a string                  |
//! | string     | string                                 |

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use super::classify::parse_timestamp;
use super::model::{Complex, DType, Scalar, TypedTable};

/// Rows in wire form, keys in column order.
pub type Row = Map<String, JsonValue>;

#[derive(Debug, Error, PartialEq)]
pub enum SerializeError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}' of type {dtype} holds a {found} value")]
    InconsistentValue {
        column: String,
        dtype: DType,
        found: DType,
    },

    #[error("cannot decode {value} as {dtype}")]
    Undecodable { dtype: DType, value: String },
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Encode one cell.  `None` is the absent marker.
pub fn encode_value(value: Option<&Scalar>) -> JsonValue {
    let Some(value) = value else {
        return JsonValue::Null;
    };
    match value {
        Scalar::Bool(b) => JsonValue::Bool(*b),
        Scalar::Int(i) => JsonValue::from(*i),
        Scalar::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Scalar::Complex(c) => JsonValue::String(c.to_string()),
        Scalar::Timestamp(ts) => JsonValue::String(format_timestamp(ts)),
        Scalar::Category(label) | Scalar::Text(label) => JsonValue::String(label.clone()),
    }
}

/// Inverse of [`encode_value`] for a column of type `dtype`.
pub fn decode_value(dtype: DType, json: &JsonValue) -> Result<Option<Scalar>, SerializeError> {
    if json.is_null() {
        return Ok(None);
    }
    let undecodable = || SerializeError::Undecodable {
        dtype,
        value: json.to_string(),
    };
    let scalar = match dtype {
        DType::Boolean => json.as_bool().map(Scalar::Bool),
        DType::Integer => json.as_i64().map(Scalar::Int),
        DType::Float => json.as_f64().map(Scalar::Float),
        DType::Complex => json.as_str().and_then(Complex::parse).map(Scalar::Complex),
        DType::Timestamp => json.as_str().and_then(parse_timestamp).map(Scalar::Timestamp),
        DType::Categorical => json.as_str().map(|s| Scalar::Category(s.to_string())),
        DType::String => json.as_str().map(|s| Scalar::Text(s.to_string())),
    };
    scalar.map(Some).ok_or_else(undecodable)
}

/// Encode a typed table as one JSON object per row.
pub fn serialize_rows(table: &TypedTable) -> Result<Vec<Row>, SerializeError> {
    let mut names = BTreeSet::new();
    for col in &table.columns {
        if !names.insert(col.name.as_str()) {
            return Err(SerializeError::DuplicateColumn(col.name.clone()));
        }
        if col.len() != table.row_count {
            return Err(SerializeError::RaggedColumn {
                column: col.name.clone(),
                expected: table.row_count,
                actual: col.len(),
            });
        }
        if let Some(bad) = col.values.iter().flatten().find(|v| v.dtype() != col.dtype) {
            return Err(SerializeError::InconsistentValue {
                column: col.name.clone(),
                dtype: col.dtype,
                found: bad.dtype(),
            });
        }
    }

    let rows = (0..table.row_count)
        .map(|row| {
            table
                .columns
                .iter()
                .map(|col| (col.name.clone(), encode_value(col.values[row].as_ref())))
                .collect::<Row>()
        })
        .collect();
    Ok(rows)
}
