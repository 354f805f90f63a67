//! Merged rule configuration endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, warn};

use alertgen_rules::{merge, render, OutputFormat, PersistedRule, SnapshotSummary};

use crate::state::AppState;

use super::{bad_request, error_response, internal_error, store_error, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RulesQueryParams {
    /// `yaml` (default) or `json`.
    pub format: Option<String>,
}

/// GET /rules -- persisted rules merged with the generated snapshot.
pub async fn get_rules(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RulesQueryParams>,
) -> ApiResult<Response> {
    let format = match params.format.as_deref() {
        None | Some("") => OutputFormat::default(),
        Some(raw) => raw.parse::<OutputFormat>().map_err(bad_request)?,
    };

    // Store query first; the snapshot is only loaded once rows are in hand.
    let rows = state.store.list(None).await.map_err(store_error)?;
    let persisted: Vec<PersistedRule> = rows.iter().map(PersistedRule::from).collect();

    let snapshot = state.snapshots.load();
    let config = merge(&persisted, &snapshot.config, state.include_generated);
    debug!(
        persisted = persisted.len(),
        groups = config.groups.len(),
        rules = config.rule_count(),
        %format,
        "serving merged rules"
    );

    let rendered = render(&config, format).map_err(|e| {
        warn!(error = %e, %format, "failed to render rule configuration");
        internal_error(e)
    })?;

    Ok(([(header::CONTENT_TYPE, rendered.content_type)], rendered.body).into_response())
}

/// GET /rules/snapshot -- describe the currently published snapshot.
pub async fn snapshot_summary(State(state): State<Arc<AppState>>) -> Json<SnapshotSummary> {
    Json(state.snapshots.load().summary())
}

/// POST /rules/reload -- re-read the template and publish a new snapshot.
///
/// On template errors the previous snapshot stays published.
pub async fn reload_rules(State(state): State<Arc<AppState>>) -> ApiResult<Json<SnapshotSummary>> {
    let _guard = state.reload_lock.lock().await;

    let template = state.template_loader.load().map_err(|e| {
        warn!(
            path = %state.template_loader.path().display(),
            error = %e,
            "template reload failed, keeping current snapshot"
        );
        error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    let snapshot = state.generator.regenerate(&template, &state.snapshots);
    Ok(Json(snapshot.summary()))
}
