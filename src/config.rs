//! Configuration for feed defaults.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (DOCFEED_SORT, DOCFEED_READ_ONLY)
//! 2. Config file (.docfeed/config.yaml)
//! 3. Defaults (all content types, page order, editable)
//!
//! Config file discovery:
//! - Searches current directory and parents for .docfeed/config.yaml
//! - Falls back to ~/.docfeed/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::feed::{ContentFilters, FeedOptions, SortOption};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub feed: FeedSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedSection {
    /// page | type | date
    pub sort: Option<String>,
    pub read_only: Option<bool>,
    /// Default filters, in the same shape the UI sends
    pub filters: Option<ContentFilters>,
}

/// Resolved configuration
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub filters: ContentFilters,
    pub sort_by: SortOption,
    pub read_only: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Feed options seeded from this configuration
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions::new(self.filters.clone(), self.sort_by).read_only(self.read_only)
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".docfeed").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".docfeed").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse a boolean environment value ("1", "true", "yes", "on")
fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("Invalid boolean value: {}", other),
    }
}

/// Merge a parsed config file (if any) with environment overrides
fn resolve(
    config: Option<ConfigFile>,
    config_file: Option<PathBuf>,
    env_sort: Option<String>,
    env_read_only: Option<String>,
) -> Result<ResolvedConfig> {
    let feed = config.map(|c| c.feed).unwrap_or_default();

    let sort_by = match env_sort.or(feed.sort) {
        Some(sort) => sort.parse::<SortOption>().context("Invalid feed sort option")?,
        None => SortOption::default(),
    };

    let read_only = match env_read_only {
        Some(value) => parse_flag(&value).context("Invalid DOCFEED_READ_ONLY")?,
        None => feed.read_only.unwrap_or(false),
    };

    Ok(ResolvedConfig {
        filters: feed.filters.unwrap_or_default(),
        sort_by,
        read_only,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let config = match config_file {
        Some(ref path) => {
            info!("Using config file {}", path.display());
            Some(load_config_file(path)?)
        }
        None => None,
    };

    resolve(
        config,
        config_file,
        std::env::var("DOCFEED_SORT").ok(),
        std::env::var("DOCFEED_READ_ONLY").ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
