//! Integration tests that verify the shipped `template.yaml` at the workspace
//! root loads and expands into a servable configuration.

use alertgen_core::RuleConfig;
use alertgen_rules::{
    merge, render, GeneratorParams, OutputFormat, PersistedRule, RuleGenerator, SelectionPolicy,
    TemplateLoader,
};

/// Integration tests run from the crate directory, so we go up two levels.
fn sample_loader() -> TemplateLoader {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    TemplateLoader::new(manifest.join("../../template.yaml"))
}

#[test]
fn sample_template_loads() {
    let template = sample_loader().load().expect("sample template should load");
    let alerts: Vec<_> = template.pool().iter().map(|r| r.alert.as_str()).collect();
    assert_eq!(alerts, vec!["HighCPU", "HighMemory", "DiskAlmostFull"]);
    assert_eq!(template.concurrency(), 2);
    assert_eq!(template.interval(), 60);

    for rule in template.pool() {
        assert!(!rule.expr.is_empty(), "{} has no expr", rule.alert);
        assert!(rule.labels.contains_key("severity"), "{} has no severity", rule.alert);
    }
}

#[test]
fn sample_template_round_robin_cycles_pool() {
    let template = sample_loader().load().unwrap();
    let snapshot = RuleGenerator::new(GeneratorParams {
        group_count: 2,
        rules_per_group: 4,
        policy: SelectionPolicy::RoundRobin,
    })
    .generate(&template);

    let group = &snapshot.config.groups[1];
    assert_eq!(group.name, "group_2");
    let alerts: Vec<_> = group.rules.iter().map(|r| r.alert.as_str()).collect();
    assert_eq!(
        alerts,
        vec![
            "group_2_HighCPU_1",
            "group_2_HighMemory_2",
            "group_2_DiskAlmostFull_3",
            "group_2_HighCPU_4",
        ]
    );
    assert_eq!(group.rules[1].for_duration, "10m");
}

#[test]
fn sample_expansion_survives_yaml_rendering() {
    let template = sample_loader().load().unwrap();
    let snapshot = RuleGenerator::new(GeneratorParams {
        group_count: 3,
        rules_per_group: 2,
        policy: SelectionPolicy::Random { seed: Some(42) },
    })
    .generate(&template);

    let persisted = vec![PersistedRule {
        id: 1,
        alert: "Watchdog".into(),
        expr: "vector(1)".into(),
        labels: r#"{"severity":"none"}"#.into(),
        group_name: "meta".into(),
        enabled: true,
        ..Default::default()
    }];
    let merged = merge(&persisted, &snapshot.config, true);

    let rendered = render(&merged, OutputFormat::Yaml).unwrap();
    let text = std::str::from_utf8(&rendered.body).unwrap();
    // Templated annotations must stay literal.
    assert!(text.contains("{{ $labels.instance }}"));

    let parsed: RuleConfig = serde_yaml::from_slice(&rendered.body).unwrap();
    assert_eq!(parsed, merged);
    assert_eq!(parsed.groups[0].name, "meta");
    assert_eq!(parsed.rule_count(), 7);
}
