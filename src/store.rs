//! Persistence of analysis records.
//!
//! Two backends: an in-process map (the default) and a directory holding one
//! JSON document per record.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use thiserror::Error;

pub use crate::record::{AnalysisRecord, PendingRecord, RecordId, RecordSummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("malformed record id '{0}'")]
    MalformedId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage for analysis records.  Records are written once and never changed.
pub trait RecordStore: Send + Sync {
    /// Persist `pending` under a fresh id and creation time.
    fn insert(&self, pending: PendingRecord) -> StoreResult<AnalysisRecord>;

    /// Fetch a record exactly as stored.
    fn get(&self, id: &RecordId) -> StoreResult<AnalysisRecord>;

    /// Summaries of all records, newest first.
    fn list(&self) -> StoreResult<Vec<RecordSummary>>;

    /// Parse a client-supplied id and fetch the record.
    fn get_by_str(&self, id: &str) -> StoreResult<AnalysisRecord> {
        let id: RecordId = id
            .parse()
            .map_err(|_| StoreError::MalformedId(id.to_string()))?;
        self.get(&id)
    }
}

fn newest_first(mut summaries: Vec<RecordSummary>) -> Vec<RecordSummary> {
    summaries.sort_by(|a, b| b.upload_time.cmp(&a.upload_time).then(a.id.cmp(&b.id)));
    summaries
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Records kept in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<RecordId, AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, pending: PendingRecord) -> StoreResult<AnalysisRecord> {
        let record = pending.into_record(RecordId::new(), Utc::now());
        self.records.write().insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: &RecordId) -> StoreResult<AnalysisRecord> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn list(&self) -> StoreResult<Vec<RecordSummary>> {
        let summaries = self.records.read().values().map(RecordSummary::from).collect();
        Ok(newest_first(summaries))
    }
}

// ---------------------------------------------------------------------------
// Directory of JSON files
// ---------------------------------------------------------------------------

/// One `<id>.json` file per record inside `root`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(DirectoryStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &RecordId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read(&self, path: &Path) -> StoreResult<AnalysisRecord> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl RecordStore for DirectoryStore {
    fn insert(&self, pending: PendingRecord) -> StoreResult<AnalysisRecord> {
        let record = pending.into_record(RecordId::new(), Utc::now());
        let bytes = serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Corrupt {
            path: self.path_for(&record.id),
            source,
        })?;

        // Write beside the target and rename, so readers never see half a record.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(&record.id))
            .map_err(|e| StoreError::Io(e.error))?;

        debug!("stored record {} in {}", record.id, self.root.display());
        Ok(record)
    }

    fn get(&self, id: &RecordId) -> StoreResult<AnalysisRecord> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(*id));
        }
        self.read(&path)
    }

    fn list(&self) -> StoreResult<Vec<RecordSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read(&path) {
                Ok(record) => summaries.push(RecordSummary::from(&record)),
                Err(e) => warn!("skipping unreadable record: {e}"),
            }
        }
        Ok(newest_first(summaries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn pending(name: &str) -> PendingRecord {
        let mut row = serde_json::Map::new();
        row.insert("x".into(), json!(1));
        PendingRecord {
            file_name: name.into(),
            columns: vec!["x".into()],
            dtypes: BTreeMap::from([("x".to_string(), "integer".to_string())]),
            data: vec![row],
        }
    }

    fn exercise(store: &dyn RecordStore) {
        let first = store.insert(pending("a.csv")).unwrap();
        let second = store.insert(pending("b.csv")).unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(store.get(&first.id).unwrap(), first);
        assert_eq!(store.get_by_str(&second.id.to_string()).unwrap(), second);

        let missing = RecordId::new();
        assert!(matches!(store.get(&missing), Err(StoreError::NotFound(id)) if id == missing));
        assert!(matches!(store.get_by_str("zzz"), Err(StoreError::MalformedId(_))));

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].upload_time >= listed[1].upload_time);
        assert_eq!(listed[0].row_count, 1);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        exercise(&store);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn directory_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path().join("records")).unwrap();
        exercise(&store);

        // A second handle on the same directory sees the same records.
        let reopened = DirectoryStore::open(store.root()).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 2);
    }

    #[test]
    fn directory_store_reports_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path()).unwrap();
        let id = RecordId::new();
        fs::write(dir.path().join(format!("{id}.json")), "{not json").unwrap();
        assert!(matches!(store.get(&id), Err(StoreError::Corrupt { .. })));
        assert!(store.list().unwrap().is_empty());
    }
}
