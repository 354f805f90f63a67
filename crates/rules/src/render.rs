//! Rendering a [`RuleConfig`] as YAML or JSON.

use std::fmt;
use std::str::FromStr;

use alertgen_core::RuleConfig;

pub const YAML_CONTENT_TYPE: &str = "application/x-yaml";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Output format selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Yaml => YAML_CONTENT_TYPE,
            OutputFormat::Json => JSON_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported format '{}', expected 'yaml' or 'json'", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rendered configuration ready to be written to a response body.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

pub fn render(config: &RuleConfig, format: OutputFormat) -> Result<Rendered, RenderError> {
    let body = match format {
        OutputFormat::Yaml => serde_yaml::to_string(config)?.into_bytes(),
        OutputFormat::Json => serde_json::to_vec(config)?,
    };
    Ok(Rendered {
        body,
        content_type: format.content_type(),
    })
}
