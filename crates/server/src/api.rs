//! HTTP handlers.
//!
//! - [`merged`]: `/rules`: the merged configuration served to the evaluator,
//!   plus snapshot inspection and reload.
//! - [`persisted`]: `/api/rules`: CRUD over stored rules.

pub mod merged;
pub mod persisted;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

// ── Error responses ───────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn error_response(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: msg.into() }))
}

pub(crate) fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub(crate) fn bad_request(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::BAD_REQUEST, msg)
}

pub(crate) fn store_error(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    if let StoreError::Database(ref db) = e {
        tracing::error!(error = %db, "rule store query failed");
    }
    error_response(e.status_code(), e.to_string())
}

// ── Health ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
