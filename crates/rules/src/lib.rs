//! Alerting-rule generation and merge pipeline.
//!
//! This crate provides:
//! - Template loading and validation (`loader`)
//! - Synthetic rule expansion with pluggable selection policies (`generator`)
//! - Atomically swapped, immutable generator snapshots (`snapshot`)
//! - Ordered merge of persisted rows with generated groups (`merge`)
//! - YAML / JSON rendering (`render`)

pub mod generator;
pub mod loader;
pub mod merge;
pub mod render;
pub mod snapshot;

pub use generator::{GeneratorParams, PolicyError, RuleGenerator, SelectionPolicy};
pub use loader::{Template, TemplateError, TemplateLoader};
pub use merge::{merge, PersistedRule};
pub use render::{render, OutputFormat, RenderError, Rendered};
pub use snapshot::{Snapshot, SnapshotStore, SnapshotSummary};
