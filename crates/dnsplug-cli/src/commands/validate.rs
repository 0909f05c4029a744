use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::info;

use super::{build_registry, describe, load_modules};

/// Parse every DNS provider stanza in a config file
#[derive(Args)]
pub struct ValidateCommand {
    /// Path to the config file
    pub config: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let registry = build_registry()?;
        let modules = load_modules(&registry, &self.config)?;

        for (id, module) in &modules {
            info!(module = %id, "Configuration parsed");
            println!(
                "{} {} {}",
                "✓".bright_green(),
                id.to_string().bold(),
                describe(module.as_ref())
            );
        }
        Ok(())
    }
}
