//! Merge persisted rule rows with the generated snapshot.
//!
//! Groups are keyed by name and emitted in first-seen order: persisted groups
//! first (in row order), then generated groups that had no persisted
//! counterpart. Within a shared group, persisted rules precede generated ones.

use std::collections::BTreeMap;

use alertgen_core::{Group, Labels, Rule, RuleConfig};
use indexmap::IndexMap;
use tracing::warn;

/// A rule row as held by the rule store.
///
/// `labels` and `annotations` are encoded text (JSON as written by the CRUD
/// API; any YAML mapping is accepted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedRule {
    pub id: i64,
    pub name: String,
    pub alert: String,
    pub expr: String,
    pub for_duration: String,
    pub labels: String,
    pub annotations: String,
    pub group_name: String,
    pub enabled: bool,
}

/// Failure to decode a labels/annotations blob.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed mapping: {0}")]
    Malformed(#[from] serde_yaml::Error),

    #[error("value for key '{0}' is not a scalar")]
    NotScalar(String),
}

/// Decode an encoded label/annotation mapping.
///
/// Blank and `null` blobs decode to an empty map. Scalar values (numbers,
/// booleans) are stringified.
pub fn decode_labels(blob: &str) -> Result<Labels, DecodeError> {
    if blob.trim().is_empty() {
        return Ok(Labels::new());
    }
    let raw: Option<BTreeMap<String, serde_yaml::Value>> = serde_yaml::from_str(blob)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => return Err(DecodeError::NotScalar(key)),
            };
            Ok((key, value))
        })
        .collect()
}

/// Encode a label/annotation mapping the way the rule store keeps it.
pub fn encode_labels(labels: &Labels) -> String {
    serde_json::to_string(labels).unwrap_or_else(|_| "{}".to_string())
}

fn decode_or_empty(row: &PersistedRule, field: &str, blob: &str) -> Labels {
    decode_labels(blob).unwrap_or_else(|e| {
        warn!(
            rule_id = row.id,
            alert = %row.alert,
            field,
            error = %e,
            "failed to decode persisted rule mapping, using empty map"
        );
        Labels::new()
    })
}

impl PersistedRule {
    /// Convert into a wire [`Rule`], degrading undecodable mappings to empty.
    pub fn to_rule(&self) -> Rule {
        Rule {
            alert: self.alert.clone(),
            expr: self.expr.clone(),
            for_duration: self.for_duration.clone(),
            labels: decode_or_empty(self, "labels", &self.labels),
            annotations: decode_or_empty(self, "annotations", &self.annotations),
        }
    }
}

/// Combine persisted rows with the generated configuration.
///
/// Every row is merged regardless of its `enabled` flag. When
/// `include_generated` is false the generated configuration is ignored
/// entirely.
pub fn merge(rows: &[PersistedRule], generated: &RuleConfig, include_generated: bool) -> RuleConfig {
    let mut groups: IndexMap<String, Group> = IndexMap::new();

    for row in rows {
        groups
            .entry(row.group_name.clone())
            .or_insert_with(|| Group::with_defaults(row.group_name.clone()))
            .rules
            .push(row.to_rule());
    }

    if include_generated {
        for group in &generated.groups {
            match groups.get_mut(&group.name) {
                Some(existing) => existing.rules.extend(group.rules.iter().cloned()),
                None => {
                    groups.insert(group.name.clone(), group.clone());
                }
            }
        }
    }

    RuleConfig {
        groups: groups.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use alertgen_core::DEFAULT_GROUP_INTERVAL;

    use super::*;

    fn row(id: i64, alert: &str, group: &str) -> PersistedRule {
        PersistedRule {
            id,
            name: alert.to_lowercase(),
            alert: alert.to_string(),
            expr: format!("{} > 0", alert.to_lowercase()),
            for_duration: "1m".to_string(),
            labels: r#"{"team":"db"}"#.to_string(),
            annotations: r#"{"summary":"persisted"}"#.to_string(),
            group_name: group.to_string(),
            enabled: true,
        }
    }

    fn generated() -> RuleConfig {
        RuleConfig {
            groups: vec![
                Group {
                    name: "group_1".into(),
                    concurrency: 2,
                    interval: 60,
                    rules: vec![
                        Rule {
                            alert: "group_1_HighCPU_1".into(),
                            expr: "cpu > 90".into(),
                            ..Default::default()
                        },
                        Rule {
                            alert: "group_1_HighCPU_2".into(),
                            expr: "cpu > 90".into(),
                            ..Default::default()
                        },
                    ],
                },
                Group {
                    name: "group_2".into(),
                    concurrency: 2,
                    interval: 60,
                    rules: vec![Rule {
                        alert: "group_2_HighCPU_1".into(),
                        expr: "cpu > 90".into(),
                        ..Default::default()
                    }],
                },
            ],
        }
    }

    #[test]
    fn identity_when_no_rows() {
        let gen = generated();
        assert_eq!(merge(&[], &gen, true), gen);
    }

    #[test]
    fn flag_off_keeps_only_persisted_groups() {
        let rows = vec![row(1, "DbDown", "db"), row(2, "Cpu", "group_1")];
        let merged = merge(&rows, &generated(), false);
        let names: Vec<_> = merged.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["db", "group_1"]);
        assert_eq!(merged.rule_count(), 2);
    }

    #[test]
    fn shared_group_name_unions_persisted_first() {
        let rows = vec![row(1, "Persisted", "group_1")];
        let merged = merge(&rows, &generated(), true);

        assert_eq!(merged.groups.len(), 2);
        let g1 = merged.group("group_1").unwrap();
        let alerts: Vec<_> = g1.rules.iter().map(|r| r.alert.as_str()).collect();
        assert_eq!(alerts, vec!["Persisted", "group_1_HighCPU_1", "group_1_HighCPU_2"]);
        // The persisted row created the group, so it carries store defaults.
        assert_eq!(g1.interval, DEFAULT_GROUP_INTERVAL);
        assert_eq!(g1.concurrency, 0);
    }

    #[test]
    fn generated_only_groups_keep_their_settings() {
        let merged = merge(&[row(1, "DbDown", "db")], &generated(), true);
        let names: Vec<_> = merged.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["db", "group_1", "group_2"]);
        let g2 = merged.group("group_2").unwrap();
        assert_eq!((g2.concurrency, g2.interval), (2, 60));
    }

    #[test]
    fn group_order_follows_first_seen_rows() {
        let rows = vec![
            row(1, "A", "zeta"),
            row(2, "B", "alpha"),
            row(3, "C", "zeta"),
            row(4, "D", "mid"),
        ];
        let merged = merge(&rows, &RuleConfig::default(), true);
        let names: Vec<_> = merged.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        let zeta: Vec<_> = merged.groups[0].rules.iter().map(|r| r.alert.as_str()).collect();
        assert_eq!(zeta, vec!["A", "C"]);
    }

    #[test]
    fn disabled_rows_are_still_merged() {
        let mut disabled = row(2, "Off", "db");
        disabled.enabled = false;
        let merged = merge(&[row(1, "On", "db"), disabled], &RuleConfig::default(), false);
        assert_eq!(merged.rule_count(), 2);
        let alerts: Vec<_> = merged.groups[0].rules.iter().map(|r| r.alert.as_str()).collect();
        assert_eq!(alerts, vec!["On", "Off"]);
    }

    #[test]
    fn lone_disabled_row_is_merged_with_generation_off() {
        let mut only = row(1, "Paused", "g1");
        only.enabled = false;
        let merged = merge(&[only], &RuleConfig::default(), false);
        assert_eq!(merged.rule_count(), 1);
        assert_eq!(merged.groups[0].name, "g1");
    }

    #[test]
    fn malformed_blob_degrades_to_empty_map() {
        let mut bad = row(1, "Bad", "db");
        bad.labels = "{not: [valid".to_string();
        bad.annotations = r#"{"nested": {"a": "b"}}"#.to_string();
        let merged = merge(&[bad], &RuleConfig::default(), false);
        let rule = &merged.groups[0].rules[0];
        assert!(rule.labels.is_empty());
        assert!(rule.annotations.is_empty());
        assert_eq!(rule.expr, "bad > 0");
    }

    #[test]
    fn decode_accepts_json_yaml_and_blank() {
        let json = decode_labels(r#"{"severity":"critical","team":"db"}"#).unwrap();
        assert_eq!(json.get("severity").map(String::as_str), Some("critical"));

        let yaml = decode_labels("severity: page\nretries: 3\nprod: true").unwrap();
        assert_eq!(yaml.get("retries").map(String::as_str), Some("3"));
        assert_eq!(yaml.get("prod").map(String::as_str), Some("true"));

        assert!(decode_labels("").unwrap().is_empty());
        assert!(decode_labels("null").unwrap().is_empty());
        assert!(matches!(decode_labels("[1, 2]"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn encode_then_decode_preserves_mapping() {
        let mut labels = Labels::new();
        labels.insert("severity".into(), "warning".into());
        labels.insert("quote".into(), "say \"hi\"".into());
        assert_eq!(decode_labels(&encode_labels(&labels)).unwrap(), labels);
    }
}
