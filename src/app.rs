//! HTTP surface.
//!
//! | Method | Path                    | Description                    |
//! |--------|-------------------------|--------------------------------|
//! | `POST` | `/api/process-data/`    | Upload a file (field `file`)   |
//! | `GET`  | `/api/analysis/:id/`    | Fetch a stored analysis        |
//! | `GET`  | `/api/analyses/`        | List stored analyses           |
//! | `GET`  | `/health`               | Liveness                       |

use std::collections::BTreeMap;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AnalysisError;
use crate::record::RecordId;
use crate::service::CancelFlag;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the router over `state`.
///
/// `cors_origins` empty means any origin is allowed.
pub fn router(state: AppState, max_upload_bytes: usize, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/process-data/", post(upload))
        .route("/api/process-data", post(upload))
        .route("/api/analysis/:id/", get(fetch_analysis))
        .route("/api/analysis/:id", get(fetch_analysis))
        .route("/api/analyses/", get(list_analyses))
        .route("/api/analyses", get(list_analyses))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("ignoring invalid CORS origin '{o}'");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Returned by a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: RecordId,
    pub file_name: String,
    pub columns: Vec<String>,
    pub dtypes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/process-data/` — analyse the multipart field `file`.
async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Anything that is not a multipart body cannot carry a file.
    let Ok(mut multipart) = multipart else {
        return failure(AnalysisError::NoFileProvided);
    };
    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let name = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some((name, bytes.to_vec()));
                        break;
                    }
                    Err(e) => return failure(unreadable_upload(e)),
                }
            }
            Ok(None) => break,
            Err(e) => return failure(unreadable_upload(e)),
        }
    }

    let Some((file_name, bytes)) = file else {
        return failure(AnalysisError::NoFileProvided);
    };
    info!("received {file_name} ({} bytes)", bytes.len());

    // Dropping this future (client gone) drops the guard and stops the
    // blocking task before anything is stored.
    let cancel = CancelFlag::new();
    let guard = cancel.guard();
    let analyzer = state.analyzer.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        analyzer.analyze_upload_with(&file_name, &bytes, &cancel)
    })
    .await;
    guard.disarm();

    match outcome {
        Ok(Ok(record)) => {
            let body = UploadResponse {
                id: record.id,
                file_name: record.file_name,
                columns: record.columns,
                dtypes: record.dtypes,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => failure(e),
        Err(join) => failure(task_failed("analysis", join)),
    }
}

/// `GET /api/analysis/:id/` — the stored record, unchanged.
async fn fetch_analysis(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let analyzer = state.analyzer.clone();
    match tokio::task::spawn_blocking(move || analyzer.fetch(&id)).await {
        Ok(Ok(record)) => Json(record).into_response(),
        Ok(Err(e)) => failure(e),
        Err(join) => failure(task_failed("lookup", join)),
    }
}

/// `GET /api/analyses/` — summaries, newest first.
async fn list_analyses(State(state): State<AppState>) -> Response {
    let analyzer = state.analyzer.clone();
    match tokio::task::spawn_blocking(move || analyzer.recent()).await {
        Ok(Ok(summaries)) => Json(summaries).into_response(),
        Ok(Err(e)) => failure(e),
        Err(join) => failure(task_failed("listing", join)),
    }
}

fn unreadable_upload(e: MultipartError) -> AnalysisError {
    AnalysisError::ParseFailure(format!("reading upload: {e}"))
}

fn task_failed(what: &str, join: JoinError) -> AnalysisError {
    AnalysisError::StorageFailure(format!("{what} task failed: {join}"))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

fn failure(err: AnalysisError) -> Response {
    if err.status_code().is_server_error() {
        warn!("request failed: {err}");
    }
    err.into_response()
}
