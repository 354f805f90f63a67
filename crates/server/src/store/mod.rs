//! Persisted alert rules (`alert_rules` table).
//!
//! [`RuleStore`] is the seam between the HTTP layer and storage. The merge
//! pipeline only needs [`RuleStore::list`]; the remaining operations back the
//! `/api/rules` CRUD endpoints. [`PgRuleStore`] is used when PostgreSQL is
//! configured, [`MemoryRuleStore`] otherwise (and in tests).

mod memory;
mod postgres;

use alertgen_core::Labels;
use alertgen_rules::merge::encode_labels;
use alertgen_rules::PersistedRule;
use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryRuleStore;
pub use postgres::PgRuleStore;

// ── Types ────────────────────────────────────────────────────────────

/// A stored rule row. Labels and annotations stay encoded as stored.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AlertRuleRecord {
    pub id: i64,
    pub name: String,
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for")]
    #[sqlx(rename = "for")]
    pub for_duration: String,
    pub labels: String,
    pub annotations: String,
    pub group_name: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AlertRuleRecord> for PersistedRule {
    fn from(record: &AlertRuleRecord) -> Self {
        PersistedRule {
            id: record.id,
            name: record.name.clone(),
            alert: record.alert.clone(),
            expr: record.expr.clone(),
            for_duration: record.for_duration.clone(),
            labels: record.labels.clone(),
            annotations: record.annotations.clone(),
            group_name: record.group_name.clone(),
            enabled: record.enabled,
        }
    }
}

/// Request body for creating or replacing a rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertRuleRequest {
    #[serde(default)]
    pub name: String,
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for", default)]
    pub for_duration: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: Labels,
    pub group_name: String,
    /// Defaults to `true` if not provided.
    pub enabled: Option<bool>,
}

impl AlertRuleRequest {
    fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in [
            ("alert", &self.alert),
            ("expr", &self.expr),
            ("group_name", &self.group_name),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::Invalid(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    fn encoded_labels(&self) -> String {
        encode_labels(&self.labels)
    }

    fn encoded_annotations(&self) -> String {
        encode_labels(&self.annotations)
    }

    fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

// ── Error type ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid rule: {0}")]
    Invalid(String),

    #[error("alert rule not found: {0}")]
    NotFound(i64),

    #[error("an alert rule named '{0}' already exists")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Map to an HTTP status code for API responses.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ── Store trait ──────────────────────────────────────────────────────

#[async_trait]
pub trait RuleStore: Send + Sync {
    /// All rows ordered by id, optionally restricted to one group.
    async fn list(&self, group_name: Option<&str>) -> Result<Vec<AlertRuleRecord>, StoreError>;

    async fn get(&self, id: i64) -> Result<AlertRuleRecord, StoreError>;

    async fn create(&self, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError>;

    /// Replace every user-editable field of an existing row.
    async fn update(&self, id: i64, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
