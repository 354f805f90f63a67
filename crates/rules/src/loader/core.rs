//! Core [`TemplateLoader`]: reads and validates the generator's rule template.

use std::fs;
use std::path::{Path, PathBuf};

use alertgen_core::{Group, Rule, RuleConfig};
use tracing::info;

use super::error::{Result, TemplateError};

/// A validated rule template.
///
/// The first group is the canonical rule pool. Its `concurrency` and
/// `interval` become the defaults for every generated group. Any further
/// groups are kept but never drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    config: RuleConfig,
}

impl Template {
    /// Rule archetypes the generator draws from. Never empty.
    pub fn pool(&self) -> &[Rule] {
        &self.primary().rules
    }

    pub fn concurrency(&self) -> u32 {
        self.primary().concurrency
    }

    pub fn interval(&self) -> u64 {
        self.primary().interval
    }

    /// The full parsed template document.
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    fn primary(&self) -> &Group {
        // Validated non-empty in `TemplateLoader::parse_str`.
        &self.config.groups[0]
    }
}

/// Loads rule templates from YAML files on disk.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    path: PathBuf,
}

impl TemplateLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the template file this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the template file.
    pub fn load(&self) -> Result<Template> {
        let contents = fs::read_to_string(&self.path).map_err(|source| TemplateError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let template = Self::parse_str(&contents)?;
        info!(
            path = %self.path.display(),
            groups = template.config().groups.len(),
            pool_size = template.pool().len(),
            "loaded rule template"
        );
        Ok(template)
    }

    /// Parse and validate a template from an in-memory YAML document.
    pub fn parse_str(contents: &str) -> Result<Template> {
        let config: RuleConfig = serde_yaml::from_str(contents)?;

        let first = config.groups.first().ok_or_else(|| {
            TemplateError::Validation("template must contain at least one group".to_string())
        })?;
        if first.rules.is_empty() {
            return Err(TemplateError::Validation(format!(
                "first template group '{}' must contain at least one rule",
                first.name
            )));
        }

        Ok(Template { config })
    }
}
