use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label and annotation maps. Ordered so rendered output is stable.
pub type Labels = BTreeMap<String, String>;

/// Interval assigned to groups that only exist in the rule store.
pub const DEFAULT_GROUP_INTERVAL: u64 = 30;

/// A single alerting condition in vmalert/Prometheus rule-file shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for", default)]
    pub for_duration: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub annotations: Labels,
}

/// A named bundle of rules evaluated together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub concurrency: u32,
    /// Evaluation interval in seconds.
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Group {
    /// Empty group carrying the store default interval and zero concurrency.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            concurrency: 0,
            interval: DEFAULT_GROUP_INTERVAL,
            rules: Vec::new(),
        }
    }
}

/// Top-level rule configuration handed to the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl RuleConfig {
    /// Total number of rules across all groups.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_uses_for_key_on_the_wire() {
        let rule = Rule {
            alert: "HighCPU".into(),
            expr: "cpu > 90".into(),
            for_duration: "5m".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["for"], "5m");
        assert!(json.get("for_duration").is_none());
    }

    #[test]
    fn group_fields_default_when_missing() {
        let group: Group = serde_json::from_str(r#"{"name":"g1"}"#).unwrap();
        assert_eq!(group.concurrency, 0);
        assert_eq!(group.interval, 0);
        assert!(group.rules.is_empty());
    }

    #[test]
    fn with_defaults_uses_store_interval() {
        let group = Group::with_defaults("db");
        assert_eq!(group.interval, DEFAULT_GROUP_INTERVAL);
        assert_eq!(group.concurrency, 0);
    }

    #[test]
    fn rule_count_sums_groups() {
        let config = RuleConfig {
            groups: vec![
                Group {
                    name: "a".into(),
                    rules: vec![Rule::default(), Rule::default()],
                    ..Default::default()
                },
                Group {
                    name: "b".into(),
                    rules: vec![Rule::default()],
                    ..Default::default()
                },
            ],
        };
        assert_eq!(config.rule_count(), 3);
        assert_eq!(config.group("b").map(|g| g.rules.len()), Some(1));
        assert!(config.group("c").is_none());
    }
}
