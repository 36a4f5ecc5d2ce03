//! `badgesync sync` - refresh the cache if the badge list changed.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::CommandContext;
use crate::cache::SyncSource;
use crate::hook::Served;

/// Bring the badge cache up to date, as a build would on start.
///
/// Never fails because the badge API is unreachable: stale cache data or an
/// empty list is used instead.
#[derive(Args, Debug)]
pub struct SyncCommand {
    /// Print the resulting records as JSON to stdout
    #[arg(long)]
    json: bool,
}

impl SyncCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        let module = ctx.module()?;
        let served = module.build_start().await;

        if self.json {
            println!("{}", module.served_json().await);
            return Ok(());
        }

        let cache_file = ctx.paths.cache_file.display();
        match served {
            Served::Current(SyncSource::Cache) => {
                println!("{} Badge list unchanged, using {cache_file}", "✓".green());
            }
            Served::Current(SyncSource::Fetched) => {
                println!("{} Badge data refreshed → {cache_file}", "✓".green());
            }
            Served::Stale => {
                println!(
                    "{} Badge data could not be refreshed; serving cached data",
                    "⚠".yellow()
                );
            }
            Served::Empty => {
                println!(
                    "{} Badge data unavailable and no cache exists; serving no badges",
                    "⚠".yellow()
                );
            }
        }
        Ok(())
    }
}
