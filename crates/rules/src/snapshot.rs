//! Immutable generator snapshots and their atomic holder.

use std::sync::Arc;

use alertgen_core::RuleConfig;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::generator::GeneratorParams;

/// One generation run's output. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub config: RuleConfig,
    pub params: GeneratorParams,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(config: RuleConfig, params: GeneratorParams) -> Self {
        Self {
            config,
            params,
            generated_at: Utc::now(),
        }
    }

    /// Snapshot with no groups, published before the first generation run.
    pub fn empty() -> Self {
        Self::new(RuleConfig::default(), GeneratorParams::default())
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            params: self.params,
            generated_at: self.generated_at,
            rule_count: self.config.rule_count(),
        }
    }
}

/// Lightweight description of a snapshot for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    #[serde(flatten)]
    pub params: GeneratorParams,
    pub generated_at: DateTime<Utc>,
    pub rule_count: usize,
}

/// Holder of the currently published snapshot.
///
/// Readers get an `Arc` to whichever snapshot was current when they called
/// [`load`](Self::load) and keep it alive for as long as they need; a
/// concurrent [`publish`](Self::publish) swaps the pointer and never touches
/// the snapshot a reader already holds.
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.publish_arc(Arc::new(snapshot))
    }

    pub fn publish_arc(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        self.current.swap(snapshot)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(Snapshot::empty())
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current.load();
        f.debug_struct("SnapshotStore")
            .field("generated_at", &current.generated_at)
            .field("groups", &current.config.groups.len())
            .finish()
    }
}
