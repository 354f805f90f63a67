//! HTTP router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::{self, merged, persisted};
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        // Merged configuration consumed by the rule evaluator.
        .route("/rules", get(merged::get_rules))
        .route("/rules/snapshot", get(merged::snapshot_summary))
        .route("/rules/reload", post(merged::reload_rules))
        // Persisted rule CRUD.
        .route(
            "/api/rules",
            get(persisted::list_rules).post(persisted::create_rule),
        )
        .route(
            "/api/rules/{id}",
            get(persisted::get_rule)
                .put(persisted::update_rule)
                .delete(persisted::delete_rule),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
