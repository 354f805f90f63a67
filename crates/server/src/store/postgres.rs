//! PostgreSQL-backed [`RuleStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::{AlertRuleRecord, AlertRuleRequest, RuleStore, StoreError};

const COLUMNS: &str = "id, name, alert, expr, \"for\", labels, annotations, \
                       group_name, enabled, created_at, updated_at";

pub struct PgRuleStore {
    pool: PgPool,
}

impl PgRuleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate unique-index violations on `alert` into [`StoreError::Conflict`].
fn map_write_error(e: sqlx::Error, alert: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(alert.to_string());
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl RuleStore for PgRuleStore {
    async fn list(&self, group_name: Option<&str>) -> Result<Vec<AlertRuleRecord>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM alert_rules \
             WHERE ($1::text IS NULL OR group_name = $1) \
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, AlertRuleRecord>(&sql)
            .bind(group_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<AlertRuleRecord, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM alert_rules WHERE id = $1");
        sqlx::query_as::<_, AlertRuleRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError> {
        req.validate()?;
        let sql = format!(
            "INSERT INTO alert_rules \
                (name, alert, expr, \"for\", labels, annotations, group_name, enabled) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AlertRuleRecord>(&sql)
            .bind(&req.name)
            .bind(&req.alert)
            .bind(&req.expr)
            .bind(&req.for_duration)
            .bind(req.encoded_labels())
            .bind(req.encoded_annotations())
            .bind(&req.group_name)
            .bind(req.enabled())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &req.alert))?;
        info!(id = row.id, alert = %row.alert, group = %row.group_name, "created alert rule");
        Ok(row)
    }

    async fn update(&self, id: i64, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError> {
        req.validate()?;
        let sql = format!(
            "UPDATE alert_rules SET \
                name = $2, alert = $3, expr = $4, \"for\" = $5, \
                labels = $6, annotations = $7, group_name = $8, enabled = $9, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AlertRuleRecord>(&sql)
            .bind(id)
            .bind(&req.name)
            .bind(&req.alert)
            .bind(&req.expr)
            .bind(&req.for_duration)
            .bind(req.encoded_labels())
            .bind(req.encoded_annotations())
            .bind(&req.group_name)
            .bind(req.enabled())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &req.alert))?
            .ok_or(StoreError::NotFound(id))?;
        info!(id = row.id, alert = %row.alert, "updated alert rule");
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM alert_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(id, "deleted alert rule");
        Ok(())
    }
}
