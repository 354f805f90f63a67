//! Synthetic rule generation from a [`Template`].
//!
//! Expands the template's rule pool into `group_count` groups of
//! `rules_per_group` rules each. Every generated alert is named
//! `group_{i}_{template_alert}_{j}` (1-based), so names never collide even
//! when the same archetype is drawn for many slots.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use alertgen_core::{Group, Rule, RuleConfig};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::loader::Template;
use crate::snapshot::{Snapshot, SnapshotStore};

// ── Selection policy ────────────────────────────────────────────────

/// How a template rule is chosen for each generated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Slot `j` takes `pool[(j - 1) % pool.len()]`.
    #[default]
    RoundRobin,
    /// Uniform draw per slot. Seeded from the wall clock when `seed` is `None`.
    Random { seed: Option<u64> },
}

/// Unrecognized selection policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("unknown rule selection policy: '{0}'")]
    Unknown(String),
}

impl SelectionPolicy {
    /// Build a policy from the string/seed pair carried in process config.
    pub fn from_config(selection: &str, seed: Option<u64>) -> Result<Self, PolicyError> {
        match selection.parse::<SelectionPolicy>()? {
            SelectionPolicy::Random { .. } => Ok(SelectionPolicy::Random { seed }),
            policy => Ok(policy),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::RoundRobin => write!(f, "round-robin"),
            SelectionPolicy::Random { seed: Some(seed) } => write!(f, "random(seed={})", seed),
            SelectionPolicy::Random { seed: None } => write!(f, "random"),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round-robin" | "round_robin" | "roundrobin" | "rr" => Ok(SelectionPolicy::RoundRobin),
            "random" => Ok(SelectionPolicy::Random { seed: None }),
            other => Err(PolicyError::Unknown(other.to_string())),
        }
    }
}

/// Stateful picker derived from a [`SelectionPolicy`] for one generation run.
enum Picker {
    RoundRobin,
    Random(StdRng),
}

impl Picker {
    fn pick(&mut self, slot: usize, pool_size: usize) -> usize {
        match self {
            Picker::RoundRobin => (slot - 1) % pool_size,
            Picker::Random(rng) => rng.gen_range(0..pool_size),
        }
    }
}

// ── Generator ───────────────────────────────────────────────────────

/// Parameters that fully determine a generation run (given the template).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub group_count: usize,
    pub rules_per_group: usize,
    #[serde(flatten)]
    pub policy: SelectionPolicy,
}

#[derive(Debug, Clone)]
pub struct RuleGenerator {
    params: GeneratorParams,
}

impl RuleGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// Build a fresh snapshot from the template.
    ///
    /// For an unseeded random policy the clock-derived seed is recorded in the
    /// snapshot's params so the run can be reproduced.
    pub fn generate(&self, template: &Template) -> Snapshot {
        let mut params = self.params;
        let mut picker = match params.policy {
            SelectionPolicy::RoundRobin => Picker::RoundRobin,
            SelectionPolicy::Random { seed } => {
                let seed = seed.unwrap_or_else(clock_seed);
                params.policy = SelectionPolicy::Random { seed: Some(seed) };
                Picker::Random(StdRng::seed_from_u64(seed))
            }
        };

        let pool = template.pool();
        let groups = (1..=params.group_count)
            .map(|i| Group {
                name: format!("group_{}", i),
                concurrency: template.concurrency(),
                interval: template.interval(),
                rules: (1..=params.rules_per_group)
                    .map(|j| {
                        let source = &pool[picker.pick(j, pool.len())];
                        synthesize(i, j, source)
                    })
                    .collect(),
            })
            .collect();

        let snapshot = Snapshot::new(RuleConfig { groups }, params);
        debug!(
            groups = params.group_count,
            rules_per_group = params.rules_per_group,
            policy = %params.policy,
            "generated synthetic rules"
        );
        snapshot
    }

    /// Generate and atomically publish a new snapshot, returning it.
    pub fn regenerate(&self, template: &Template, store: &SnapshotStore) -> Arc<Snapshot> {
        let snapshot = Arc::new(self.generate(template));
        store.publish_arc(Arc::clone(&snapshot));
        info!(
            groups = snapshot.params.group_count,
            rules = snapshot.config.rule_count(),
            policy = %snapshot.params.policy,
            "published rule snapshot"
        );
        snapshot
    }
}

/// Synthetic alert name for slot `(group_index, rule_index)`.
pub fn synthetic_alert_name(group_index: usize, template_alert: &str, rule_index: usize) -> String {
    format!("group_{}_{}_{}", group_index, template_alert, rule_index)
}

fn synthesize(group_index: usize, rule_index: usize, source: &Rule) -> Rule {
    Rule {
        alert: synthetic_alert_name(group_index, &source.alert, rule_index),
        expr: source.expr.clone(),
        for_duration: source.for_duration.clone(),
        labels: source.labels.clone(),
        annotations: source.annotations.clone(),
    }
}

fn clock_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n.unsigned_abs())
        .unwrap_or_else(|| now.timestamp().unsigned_abs())
}
