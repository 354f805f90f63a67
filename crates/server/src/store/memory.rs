//! In-process [`RuleStore`], used when PostgreSQL is not configured.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::{AlertRuleRecord, AlertRuleRequest, RuleStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, AlertRuleRecord>,
}

/// Rows live only as long as the process. Enforces `alert` uniqueness like
/// the table's unique index.
#[derive(Default)]
pub struct MemoryRuleStore {
    inner: RwLock<Inner>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn alert_taken(&self, alert: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|r| r.alert == alert && Some(r.id) != except)
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn list(&self, group_name: Option<&str>) -> Result<Vec<AlertRuleRecord>, StoreError> {
        let inner = self.inner.read().expect("rule store lock poisoned");
        Ok(inner
            .rows
            .values()
            .filter(|r| group_name.map_or(true, |g| r.group_name == g))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<AlertRuleRecord, StoreError> {
        let inner = self.inner.read().expect("rule store lock poisoned");
        inner.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError> {
        req.validate()?;
        let mut inner = self.inner.write().expect("rule store lock poisoned");
        if inner.alert_taken(&req.alert, None) {
            return Err(StoreError::Conflict(req.alert.clone()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = AlertRuleRecord {
            id: inner.next_id,
            name: req.name.clone(),
            alert: req.alert.clone(),
            expr: req.expr.clone(),
            for_duration: req.for_duration.clone(),
            labels: req.encoded_labels(),
            annotations: req.encoded_annotations(),
            group_name: req.group_name.clone(),
            enabled: req.enabled(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, req: &AlertRuleRequest) -> Result<AlertRuleRecord, StoreError> {
        req.validate()?;
        let mut inner = self.inner.write().expect("rule store lock poisoned");
        if !inner.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if inner.alert_taken(&req.alert, Some(id)) {
            return Err(StoreError::Conflict(req.alert.clone()));
        }

        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.name = req.name.clone();
        row.alert = req.alert.clone();
        row.expr = req.expr.clone();
        row.for_duration = req.for_duration.clone();
        row.labels = req.encoded_labels();
        row.annotations = req.encoded_annotations();
        row.group_name = req.group_name.clone();
        row.enabled = req.enabled();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("rule store lock poisoned");
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
