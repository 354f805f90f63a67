//! Error type for template loading.

/// Errors that can occur while reading or validating a rule template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Filesystem I/O error.
    #[error("IO error reading template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Template is structurally valid YAML but unusable (no groups, empty pool).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
