//! Shared setup for CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::CliConfig;
use crate::badge::{BadgeRecord, BadgeRequest};
use crate::batch::BatchFetcher;
use crate::cache::{BadgeCache, DirectoryStore};
use crate::config::{BadgeConfig, ProjectPaths};
use crate::hook::BadgeModule;
use crate::http::{HttpFetcher, ReqwestFetcher};
use crate::resolver::BadgeResolver;

/// Label printed for records without a known issuance date.
pub const UNKNOWN_DATE: &str = "issue date unknown";

/// Everything a command needs to know about the project it runs in.
#[derive(Debug)]
pub struct CommandContext {
    pub config: BadgeConfig,
    pub paths: ProjectPaths,
    pub show_progress: bool,
}

impl CommandContext {
    /// Resolve the project root and load its configuration.
    pub async fn load(cli: &CliConfig) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Cannot determine current directory")?,
        };
        let config = BadgeConfig::load(&root, cli.config_path.as_deref()).await?;
        let paths = ProjectPaths::new(&root, &config);
        debug!("Project root {}, input {}", paths.root.display(), paths.input.display());

        Ok(Self {
            config,
            paths,
            show_progress: !cli.no_progress,
        })
    }

    /// HTTP client configured with the project's timeout and user agent.
    pub fn http(&self) -> Result<Arc<dyn HttpFetcher>> {
        let fetcher = ReqwestFetcher::new(self.config.timeout(), &self.config.user_agent)?;
        Ok(Arc::new(fetcher))
    }

    pub fn resolver(&self, http: Arc<dyn HttpFetcher>) -> BadgeResolver {
        BadgeResolver::standard(
            http,
            self.config.api_base.clone(),
            self.config.placeholder_image.clone(),
        )
    }

    /// Sequential fetcher with the configured delay and, if enabled, a progress bar.
    pub fn batch(&self) -> Result<BatchFetcher> {
        Ok(BatchFetcher::new(self.resolver(self.http()?), self.config.delay())
            .with_progress(self.show_progress))
    }

    pub fn store(&self) -> DirectoryStore {
        DirectoryStore::new(&self.paths.cache_dir)
    }

    pub fn badge_cache(&self) -> Result<BadgeCache> {
        Ok(BadgeCache::new(&self.paths.input, Arc::new(self.store()), Arc::new(self.batch()?)))
    }

    pub fn module(&self) -> Result<BadgeModule> {
        Ok(BadgeModule::new(self.badge_cache()?))
    }

    /// Read and parse the badge list.
    pub async fn read_requests(&self) -> Result<Vec<BadgeRequest>> {
        read_requests(&self.paths.input).await
    }
}

async fn read_requests(path: &Path) -> Result<Vec<BadgeRequest>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read badge list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse badge list {}", path.display()))
}

/// `1. Name (2024-01-01)` lines, one per record.
pub fn summary_lines(records: &[BadgeRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!("{}. {} ({})", i + 1, r.name, r.issued_on.as_deref().unwrap_or(UNKNOWN_DATE))
        })
        .collect()
}

/// Absolute form of `path`, relative paths taken from the project root.
pub fn project_relative(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
