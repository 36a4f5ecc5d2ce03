//! `badgesync cache` - inspect or remove the cache files.

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use super::common::CommandContext;
use crate::cache::{CacheStore, content_digest};

#[derive(Args, Debug)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: Option<CacheSubcommands>,
}

#[derive(Subcommand, Debug)]
enum CacheSubcommands {
    /// Show cache location, contents and freshness (default)
    Info,
    /// Delete the cache entry and meta files
    Clean,
}

impl CacheCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            Some(CacheSubcommands::Info) | None => Self::info(&ctx).await,
            Some(CacheSubcommands::Clean) => Self::clean(&ctx),
        }
    }

    async fn info(ctx: &CommandContext) -> Result<()> {
        let store = ctx.store();

        println!("{}", "Badge Cache".bold());
        println!("Location: {}", store.describe());

        match store.read_entry() {
            Ok(records) => {
                let modified = modified_at(&ctx.paths.cache_file).unwrap_or_default();
                println!("Entry:    {} badges {}", records.len(), modified.as_str().dimmed());
            }
            Err(e) if ctx.paths.cache_file.exists() => {
                println!("Entry:    {} ({e})", "unreadable".red());
            }
            Err(_) => println!("Entry:    {}", "none".dimmed()),
        }

        let meta = store.read_meta().ok();
        match &meta {
            Some(meta) => println!("Hash:     {}", meta.hash),
            None => println!("Hash:     {}", "none".dimmed()),
        }

        let status = match (tokio::fs::read(&ctx.paths.input).await, meta) {
            (Err(_), _) => {
                format!("badge list {} not found", ctx.paths.input.display()).as_str().red()
            }
            (Ok(_), None) => "not cached".yellow(),
            (Ok(bytes), Some(meta)) if content_digest(&bytes) == meta.hash => "current".green(),
            (Ok(_), Some(_)) => "stale (badge list changed)".yellow(),
        };
        println!("Status:   {status}");
        Ok(())
    }

    fn clean(ctx: &CommandContext) -> Result<()> {
        let removed = ctx.store().clear()?;
        if removed == 0 {
            println!("Cache already empty");
        } else {
            println!(
                "{} Removed {removed} cache file(s) from {}",
                "✓".green(),
                ctx.store().describe()
            );
        }
        Ok(())
    }
}

fn modified_at(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(format!("(updated {})", local.format("%Y-%m-%d %H:%M:%S")))
}
