//! `badgesync watch` - dev-server style refresh loop.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::common::CommandContext;
use crate::cache::content_digest;
use crate::constants::DEFAULT_WATCH_INTERVAL;
use crate::hook::WatchOutcome;

/// Watch the badge list and refresh whenever its content changes.
///
/// Prints `full reload` after each successful refresh. Runs until Ctrl+C.
#[derive(Args, Debug)]
pub struct WatchCommand {
    /// Polling interval in seconds [default: 1]
    #[arg(long)]
    interval: Option<u64>,
}

async fn input_digest(path: &Path) -> Option<String> {
    tokio::fs::read(path).await.ok().map(|bytes| content_digest(&bytes))
}

impl WatchCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        let module = ctx.module()?;
        let input = ctx.paths.input.clone();

        module.build_start().await;
        let mut last = input_digest(&input).await;

        println!("Watching {} (Ctrl+C to stop)", input.display());
        let period = self
            .interval
            .map_or(DEFAULT_WATCH_INTERVAL, |secs| Duration::from_secs(secs.max(1)));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = ticker.tick() => {
                    let current = input_digest(&input).await;
                    if current == last {
                        continue;
                    }
                    debug!("Badge list digest changed");
                    last = current;

                    match module.on_file_change(&input).await {
                        WatchOutcome::FullReload => println!("full reload"),
                        WatchOutcome::Failed(reason) => {
                            eprintln!("{} Refresh failed: {reason}", "⚠".yellow());
                        }
                        WatchOutcome::Ignored => {}
                    }
                }
            }
        }
        Ok(())
    }
}
