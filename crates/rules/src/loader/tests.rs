//! Tests for the template loader.

use std::fs;

use tempfile::TempDir;

use super::*;

const VALID_TEMPLATE_YAML: &str = r#"
groups:
  - name: template
    concurrency: 2
    interval: 60
    rules:
      - alert: HighCPU
        expr: avg(cpu_usage) > 90
        for: 5m
        labels:
          severity: critical
        annotations:
          summary: CPU above 90%
      - alert: DiskFull
        expr: disk_free_bytes < 1e9
        for: 10m
  - name: ignored
    rules:
      - alert: Unused
        expr: up == 0
        for: 1m
"#;

fn write_template(contents: &str) -> (TempDir, TemplateLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("template.yaml");
    fs::write(&path, contents).unwrap();
    (dir, TemplateLoader::new(path))
}

#[test]
fn load_template_from_file() {
    let (_dir, loader) = write_template(VALID_TEMPLATE_YAML);
    let template = loader.load().unwrap();

    assert_eq!(template.pool().len(), 2);
    assert_eq!(template.concurrency(), 2);
    assert_eq!(template.interval(), 60);
    assert_eq!(template.config().groups.len(), 2);

    let cpu = &template.pool()[0];
    assert_eq!(cpu.alert, "HighCPU");
    assert_eq!(cpu.for_duration, "5m");
    assert_eq!(cpu.labels.get("severity").map(String::as_str), Some("critical"));
}

#[test]
fn rules_without_labels_get_empty_maps() {
    let template = TemplateLoader::parse_str(VALID_TEMPLATE_YAML).unwrap();
    let disk = &template.pool()[1];
    assert!(disk.labels.is_empty());
    assert!(disk.annotations.is_empty());
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let loader = TemplateLoader::new(dir.path().join("absent.yaml"));
    let err = loader.load().unwrap_err();
    assert!(matches!(err, TemplateError::Io { .. }), "got {err:?}");
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let (_dir, loader) = write_template("groups: [ {name: broken");
    assert!(matches!(loader.load(), Err(TemplateError::Parse(_))));
}

#[test]
fn template_without_groups_is_rejected() {
    let err = TemplateLoader::parse_str("groups: []").unwrap_err();
    assert!(matches!(err, TemplateError::Validation(_)));
}

#[test]
fn empty_first_group_is_rejected_even_if_later_groups_have_rules() {
    let yaml = r#"
groups:
  - name: empty
    rules: []
  - name: full
    rules:
      - alert: A
        expr: up == 0
        for: 1m
"#;
    let err = TemplateLoader::parse_str(yaml).unwrap_err();
    match err {
        TemplateError::Validation(msg) => assert!(msg.contains("empty")),
        other => panic!("expected validation error, got {other:?}"),
    }
}
