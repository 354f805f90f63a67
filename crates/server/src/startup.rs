//! Server startup: template load, initial generation, store selection.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use alertgen_rules::{GeneratorParams, RuleGenerator, SelectionPolicy, SnapshotStore, TemplateLoader};

use crate::db;
use crate::state::AppState;
use crate::store::{MemoryRuleStore, PgRuleStore, RuleStore};

/// Generator parameters from process config.
pub fn generator_params(config: &alertgen_core::config::GeneratorConfig) -> anyhow::Result<GeneratorParams> {
    let policy = SelectionPolicy::from_config(&config.selection, config.seed).context("invalid RULE_SELECTION")?;
    Ok(GeneratorParams {
        group_count: config.group_count,
        rules_per_group: config.rules_per_group,
        policy,
    })
}

/// Build `AppState`. A missing or invalid template is fatal.
pub async fn build_app_state(config: &alertgen_core::Config) -> anyhow::Result<Arc<AppState>> {
    let params = generator_params(&config.generator)?;
    let template_loader = TemplateLoader::new(config.generator.template_path.clone());
    let template = template_loader
        .load()
        .with_context(|| format!("failed to load rule template {}", template_loader.path().display()))?;

    let generator = RuleGenerator::new(params);
    let snapshots = Arc::new(SnapshotStore::default());
    generator.regenerate(&template, &snapshots);

    let store: Arc<dyn RuleStore> = match db::init_pg_pool(&config.postgres).await? {
        Some(pool) => Arc::new(PgRuleStore::new(pool)),
        None => Arc::new(MemoryRuleStore::new()),
    };

    if !config.generator.enabled {
        info!("Generated rules disabled, /rules serves persisted rules only");
    }

    Ok(Arc::new(AppState::new(
        store,
        snapshots,
        generator,
        template_loader,
        config.generator.enabled,
    )))
}
