//! Upload → infer → persist pipeline.
//!
//! ```text
//!  bytes ─► temp file ─► loader ─► normalize ─► serialize ─► store
//!              └────── removed on every exit path ──────┘
//! ```
//!
//! A [`CancelFlag`] is checked between the steps; once it is set the
//! pipeline stops and nothing is stored.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::data::classify::InferenceOptions;
use crate::data::loader::{FileFormat, load_with_format};
use crate::data::normalize::normalize_table;
use crate::error::{AnalysisError, Result};
use crate::record::{AnalysisRecord, PendingRecord, RecordSummary};
use crate::store::{RecordStore, StoreError};

/// Set when the caller abandons an upload.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// A guard that cancels this flag when dropped, unless disarmed first.
    pub fn guard(&self) -> CancelOnDrop {
        CancelOnDrop(Some(self.clone()))
    }

    fn check(&self, file_name: &str, step: &str) -> Result<()> {
        if self.is_cancelled() {
            info!("analysis of {file_name} abandoned before {step}");
            return Err(AnalysisError::Cancelled);
        }
        Ok(())
    }
}

/// Cancels its [`CancelFlag`] on drop.
pub struct CancelOnDrop(Option<CancelFlag>);

impl CancelOnDrop {
    pub fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(flag) = self.0.take() {
            flag.cancel();
        }
    }
}

/// Runs analyses and looks them up again.
#[derive(Clone)]
pub struct Analyzer {
    store: Arc<dyn RecordStore>,
    options: InferenceOptions,
    upload_dir: Option<PathBuf>,
    parallel_min_rows: usize,
}

impl Analyzer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            options: InferenceOptions::default(),
            upload_dir: None,
            parallel_min_rows: 10_000,
        }
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    /// Directory for temporary uploads (system temp dir when unset).
    pub fn with_upload_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.upload_dir = dir;
        self
    }

    pub fn with_parallel_min_rows(mut self, rows: usize) -> Self {
        self.parallel_min_rows = rows;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Analyse an uploaded file and persist the result.
    ///
    /// Nothing is stored unless every step succeeds.
    pub fn analyze_upload(&self, file_name: &str, bytes: &[u8]) -> Result<AnalysisRecord> {
        self.analyze_upload_with(file_name, bytes, &CancelFlag::new())
    }

    /// Like [`Analyzer::analyze_upload`], stopping early with
    /// [`AnalysisError::Cancelled`] once `cancel` is set.
    pub fn analyze_upload_with(
        &self,
        file_name: &str,
        bytes: &[u8],
        cancel: &CancelFlag,
    ) -> Result<AnalysisRecord> {
        let format = FileFormat::from_file_name(file_name)?;
        let upload = self.save_temp(file_name, bytes)?;

        let outcome = self.analyze_path(file_name, format, upload.path(), cancel);
        if let Err(e) = upload.close() {
            warn!("failed to remove temporary upload for {file_name}: {e}");
        }
        let pending = outcome?;

        cancel.check(file_name, "storing")?;
        let record = self.store.insert(pending)?;
        info!(
            "stored analysis {} for {} ({} rows, {} columns)",
            record.id,
            record.file_name,
            record.data.len(),
            record.columns.len()
        );
        Ok(record)
    }

    fn analyze_path(
        &self,
        file_name: &str,
        format: FileFormat,
        path: &std::path::Path,
        cancel: &CancelFlag,
    ) -> Result<PendingRecord> {
        cancel.check(file_name, "loading")?;
        let raw = load_with_format(path, format)?;
        cancel.check(file_name, "inference")?;
        let typed = normalize_table(&raw, &self.options, self.parallel_min_rows)?;
        cancel.check(file_name, "serialization")?;
        Ok(PendingRecord::from_table(file_name, &typed)?)
    }

    /// Keep the upload's extension so the loader can dispatch on it.
    fn save_temp(&self, file_name: &str, bytes: &[u8]) -> Result<NamedTempFile> {
        let suffix = std::path::Path::new(file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(&suffix);
        let created = match &self.upload_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let saving =
            |e: std::io::Error| AnalysisError::StorageFailure(format!("saving upload: {e}"));
        let mut file = created.map_err(saving)?;
        file.write_all(bytes).and_then(|_| file.flush()).map_err(saving)?;
        Ok(file)
    }

    /// Fetch a stored analysis by its client-supplied id.
    pub fn fetch(&self, id: &str) -> Result<AnalysisRecord> {
        self.store.get_by_str(id).map_err(|e| {
            if !matches!(e, StoreError::NotFound(_)) {
                warn!("lookup of analysis '{id}' failed: {e}");
            }
            e.into()
        })
    }

    /// Stored analyses, newest first.
    pub fn recent(&self) -> Result<Vec<RecordSummary>> {
        Ok(self.store.list()?)
    }
}
