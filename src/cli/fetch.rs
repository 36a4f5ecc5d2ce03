//! `badgesync fetch` - unconditional fetch of every badge.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::{CommandContext, project_relative, summary_lines};
use crate::utils::fs::safe_write;

/// Fetch all badges regardless of the cache and write them as JSON.
///
/// The cache meta is left alone, so the next `sync` still decides freshness
/// on its own.
#[derive(Args, Debug)]
pub struct FetchCommand {
    /// Output file (default: the cache entry file)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl FetchCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        let requests = ctx.read_requests().await?;
        let output = match &self.output {
            Some(path) => project_relative(&ctx.paths.root, path),
            None => ctx.paths.cache_file.clone(),
        };

        println!("Fetching {} badges...", requests.len());
        let records = ctx.batch()?.resolve_all(&requests).await;

        let json = serde_json::to_string_pretty(&records)?;
        safe_write(&output, &json)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        println!("{} Wrote {} badges to {}", "✓".green(), records.len(), output.display());
        for line in summary_lines(&records) {
            println!("  {line}");
        }
        Ok(())
    }
}
