use std::sync::Arc;

use alertgen_rules::{RuleGenerator, SnapshotStore, TemplateLoader};
use tokio::sync::Mutex;

use crate::store::RuleStore;

/// Shared state handed to every handler.
///
/// The snapshot is read lock-free through [`SnapshotStore`]; `reload_lock`
/// only serializes concurrent `/rules/reload` calls against each other.
pub struct AppState {
    pub store: Arc<dyn RuleStore>,
    pub snapshots: Arc<SnapshotStore>,
    pub generator: RuleGenerator,
    pub template_loader: TemplateLoader,
    /// Whether generated rules are merged into `/rules` responses.
    pub include_generated: bool,
    pub reload_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RuleStore>,
        snapshots: Arc<SnapshotStore>,
        generator: RuleGenerator,
        template_loader: TemplateLoader,
        include_generated: bool,
    ) -> Self {
        Self {
            store,
            snapshots,
            generator,
            template_loader,
            include_generated,
            reload_lock: Mutex::new(()),
        }
    }
}
