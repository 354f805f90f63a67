//! Persisted rule CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::store::{AlertRuleRecord, AlertRuleRequest};

use super::{store_error, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ListRulesParams {
    pub group_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /api/rules -- list stored rules, optionally filtered by group.
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRulesParams>,
) -> ApiResult<Json<Vec<AlertRuleRecord>>> {
    let group = params.group_name.as_deref().filter(|g| !g.is_empty());
    let rows = state.store.list(group).await.map_err(store_error)?;
    Ok(Json(rows))
}

/// POST /api/rules -- create a stored rule.
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AlertRuleRequest>,
) -> ApiResult<(StatusCode, Json<AlertRuleRecord>)> {
    let row = state.store.create(&req).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/rules/{id} -- fetch one stored rule.
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AlertRuleRecord>> {
    let row = state.store.get(id).await.map_err(store_error)?;
    Ok(Json(row))
}

/// PUT /api/rules/{id} -- replace a stored rule.
pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AlertRuleRequest>,
) -> ApiResult<Json<AlertRuleRecord>> {
    let row = state.store.update(id, &req).await.map_err(store_error)?;
    Ok(Json(row))
}

/// DELETE /api/rules/{id} -- delete a stored rule.
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    state.store.delete(id).await.map_err(store_error)?;
    Ok(Json(DeleteResponse {
        message: format!("Rule {} deleted successfully", id),
    }))
}
