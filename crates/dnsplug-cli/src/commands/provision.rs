use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use dnsplug_core::{ModuleId, ProvisionContext};
use tracing::info;

use super::{build_registry, describe, load_modules};

/// Parse and provision every DNS provider stanza in a config file
#[derive(Args)]
pub struct ProvisionCommand {
    /// Path to the config file
    pub config: PathBuf,

    /// Extra placeholder values as KEY=VALUE (e.g. app.region=ams3)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub values: Vec<String>,
}

impl ProvisionCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        for (id, described) in self.run()? {
            println!(
                "{} {} {}",
                "✓".bright_green(),
                id.to_string().bold(),
                described
            );
        }
        Ok(())
    }

    /// Provision every module and return its masked configuration
    pub fn run(&self) -> anyhow::Result<Vec<(ModuleId, serde_json::Value)>> {
        let registry = build_registry()?;
        let mut modules = load_modules(&registry, &self.config)?;
        let context = self.context()?;

        let mut provisioned = Vec::with_capacity(modules.len());
        for (id, module) in modules.iter_mut() {
            module
                .provision(&context)
                .with_context(|| format!("Failed to provision module {}", id))?;
            info!(module = %id, "Module provisioned");
            provisioned.push((id.clone(), describe(module.as_ref())));
        }
        Ok(provisioned)
    }

    fn context(&self) -> anyhow::Result<ProvisionContext> {
        let mut context = ProvisionContext::from_process_env();
        for pair in &self.values {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Expected KEY=VALUE, got '{}'", pair))?;
            context.replacer_mut().set(key, value);
        }
        Ok(context)
    }
}
