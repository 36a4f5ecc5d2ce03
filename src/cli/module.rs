//! `badgesync module` - print the virtual module source.

use anyhow::Result;
use clap::Args;

use super::common::CommandContext;
use crate::constants::VIRTUAL_MODULE_ID;

/// Sync, then print `export default [...];` for bundlers that import a file.
#[derive(Args, Debug)]
pub struct ModuleCommand {
    /// Module id to load
    #[arg(long, default_value = VIRTUAL_MODULE_ID)]
    id: String,
}

impl ModuleCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        let module = ctx.module()?;
        let resolved = module
            .resolve_id(&self.id)
            .ok_or_else(|| anyhow::anyhow!("Unknown module id '{}'", self.id))?;

        module.build_start().await;
        if let Some(source) = module.load(resolved).await {
            println!("{source}");
        }
        Ok(())
    }
}
