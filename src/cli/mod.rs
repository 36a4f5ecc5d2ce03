//! Command-line interface for badgesync
//!
//! # Commands
//!
//! - `sync` - Refresh the cache when the badge list changed (build-start semantics)
//! - `fetch` - Fetch every badge unconditionally and write the JSON
//! - `module` - Print the `virtual:badges` module source
//! - `watch` - Refresh on every change of the badge list
//! - `cache` - Show or delete the cache files
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Debug logging
//! - `--quiet` / `-q` - Errors only, no progress bars
//! - `--root <DIR>` - Project root (default: current directory)
//! - `--config <FILE>` - Configuration file (also `BADGESYNC_CONFIG`)
//! - `--no-progress` - Disable progress bars (also `BADGESYNC_NO_PROGRESS`)
//!
//! # Examples
//!
//! ```bash
//! badgesync sync
//! badgesync fetch --output public/badges.json
//! badgesync --root ../site watch --interval 2
//! RUST_LOG=badgesync=trace badgesync sync
//! ```

mod cache;
pub mod common;
mod fetch;
mod module;
mod sync;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::utils::progress::NO_PROGRESS_ENV;
use common::CommandContext;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub no_progress: bool,
    pub root: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(
    name = "badgesync",
    about = "Fetch Open Badge metadata for a static site and cache it",
    version,
    long_about = "badgesync resolves the badges listed in src/data/badge-urls.json into \
                  display-ready metadata and caches the result until the list changes."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Project root containing the badge list and cache directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Path to a badgesync.toml configuration file
    #[arg(short, long, global = true, env = "BADGESYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh the badge cache if the badge list changed
    Sync(sync::SyncCommand),
    /// Fetch all badges, ignoring the cache
    Fetch(fetch::FetchCommand),
    /// Print the virtual:badges module source
    Module(module::ModuleCommand),
    /// Watch the badge list and refresh on change
    Watch(watch::WatchCommand),
    /// Inspect or clean the cache
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config.log_level);
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.no_progress || self.quiet || std::env::var(NO_PROGRESS_ENV).is_ok(),
            root: self.root.clone(),
            config_path: self.config.clone(),
        }
    }

    /// Run with an explicit configuration; logging must already be set up.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let ctx = CommandContext::load(&config).await?;

        match self.command {
            Commands::Sync(cmd) => cmd.execute(ctx).await,
            Commands::Fetch(cmd) => cmd.execute(ctx).await,
            Commands::Module(cmd) => cmd.execute(ctx).await,
            Commands::Watch(cmd) => cmd.execute(ctx).await,
            Commands::Cache(cmd) => cmd.execute(ctx).await,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
