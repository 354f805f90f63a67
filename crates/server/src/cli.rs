//! CLI argument parsing.
//!
//! Every flag is optional and overrides the corresponding env-derived value in
//! [`alertgen_core::Config`].

use std::path::PathBuf;

use clap::Parser;

/// Serve alerting rules merged from the rule store and a generated template expansion.
#[derive(Parser, Debug, Default)]
#[command(name = "alertgen-server", version, about)]
pub struct Cli {
    /// Number of groups to generate.
    #[arg(long)]
    pub groups: Option<usize>,

    /// Number of rules per generated group.
    #[arg(long)]
    pub rules: Option<usize>,

    /// Merge generated rules into `/rules` responses (true/false).
    #[arg(long, value_name = "BOOL")]
    pub enable_auto_rules: Option<bool>,

    /// Path to the rule template YAML.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Template rule selection policy: round-robin or random.
    #[arg(long)]
    pub selection: Option<String>,

    /// Seed for the random selection policy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// HTTP listen port.
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Overlay explicitly passed flags onto the env-derived config.
    pub fn apply(&self, config: &mut alertgen_core::Config) {
        let generator = &mut config.generator;
        if let Some(groups) = self.groups {
            generator.group_count = groups;
        }
        if let Some(rules) = self.rules {
            generator.rules_per_group = rules;
        }
        if let Some(enabled) = self.enable_auto_rules {
            generator.enabled = enabled;
        }
        if let Some(template) = &self.template {
            generator.template_path = template.clone();
        }
        if let Some(selection) = &self.selection {
            generator.selection = selection.clone();
        }
        if self.seed.is_some() {
            generator.seed = self.seed;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
