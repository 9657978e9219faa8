use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::model::TypedTable;
use crate::data::serialize::{Row, SerializeError, serialize_rows};

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Opaque identifier of a stored analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        RecordId(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(RecordId)
    }
}

// ---------------------------------------------------------------------------
// AnalysisRecord
// ---------------------------------------------------------------------------

/// The analysis of one uploaded file, as persisted and returned to clients.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: RecordId,
    pub file_name: String,
    pub upload_time: DateTime<Utc>,
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, String>,
    pub data: Vec<Row>,
}

/// An analysis that has not been stored yet; the store assigns id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRecord {
    pub file_name: String,
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, String>,
    pub data: Vec<Row>,
}

impl PendingRecord {
    /// Serialize a typed table into the persisted shape.
    pub fn from_table(file_name: &str, table: &TypedTable) -> Result<Self, SerializeError> {
        Ok(PendingRecord {
            file_name: file_name.to_string(),
            columns: table.column_names(),
            dtypes: table.dtype_labels(),
            data: serialize_rows(table)?,
        })
    }

    pub fn into_record(self, id: RecordId, upload_time: DateTime<Utc>) -> AnalysisRecord {
        AnalysisRecord {
            id,
            file_name: self.file_name,
            upload_time,
            columns: self.columns,
            dtypes: self.dtypes,
            data: self.data,
        }
    }
}

/// Listing entry for the record index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: RecordId,
    pub file_name: String,
    pub upload_time: DateTime<Utc>,
    pub column_count: usize,
    pub row_count: usize,
}

impl From<&AnalysisRecord> for RecordSummary {
    fn from(record: &AnalysisRecord) -> Self {
        RecordSummary {
            id: record.id,
            file_name: record.file_name.clone(),
            upload_time: record.upload_time,
            column_count: record.columns.len(),
            row_count: record.data.len(),
        }
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.file_name, self.upload_time)
    }
}
