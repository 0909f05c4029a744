use clap::Args;

use super::build_registry;

/// List the registered provider modules
#[derive(Args)]
pub struct ModulesCommand {
    /// Print as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl ModulesCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Listing as printed: one ID per line, or a pretty JSON array
    pub fn render(&self) -> anyhow::Result<String> {
        let registry = build_registry()?;
        let ids: Vec<_> = registry.ids().collect();

        if self.json {
            Ok(serde_json::to_string_pretty(&ids)?)
        } else {
            Ok(ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
