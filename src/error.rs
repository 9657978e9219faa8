use axum::http::StatusCode;
use thiserror::Error;

use crate::data::classify::ClassifyError;
use crate::data::loader::LoadError;
use crate::data::normalize::ColumnFailure;
use crate::data::serialize::SerializeError;
use crate::store::StoreError;

/// Everything that can go wrong while analysing or fetching an upload.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No file uploaded")]
    NoFileProvided,

    #[error("Unsupported file format '{0}'. Only CSV and Excel files are allowed.")]
    UnsupportedFormat(String),

    #[error("Error processing the file: {0}")]
    ParseFailure(String),

    #[error("failed to infer type of column '{column}': {source}")]
    ColumnInferenceFailure {
        column: String,
        #[source]
        source: ClassifyError,
    },

    #[error("failed to serialize results: {0}")]
    SerializationFailure(#[from] SerializeError),

    #[error("analysis {0} not found")]
    RecordNotFound(String),

    #[error("storage error: {0}")]
    StorageFailure(String),

    #[error("upload abandoned before analysis finished")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::NoFileProvided => StatusCode::BAD_REQUEST,
            AnalysisError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LoadError> for AnalysisError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::UnsupportedFormat(name) => AnalysisError::UnsupportedFormat(name),
            LoadError::Parse(cause) => AnalysisError::ParseFailure(format!("{cause:#}")),
        }
    }
}

impl From<ColumnFailure> for AnalysisError {
    fn from(err: ColumnFailure) -> Self {
        AnalysisError::ColumnInferenceFailure {
            column: err.column,
            source: err.source,
        }
    }
}

impl From<StoreError> for AnalysisError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AnalysisError::RecordNotFound(id.to_string()),
            other => AnalysisError::StorageFailure(other.to_string()),
        }
    }
}
