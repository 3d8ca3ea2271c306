//! Command-line interface for docfeed.
//!
//! Loads a source bundle from disk, runs the feed pipeline, and prints
//! the result. Flags override configured defaults.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::config;
use crate::domain::SourceBundle;
use crate::feed::{
    available_labels, build_feed, ContentItemType, FeedEntry, FeedOptions, ItemData, SortOption,
};

/// docfeed - Unified content feed for annotated documents
#[derive(Parser, Debug)]
#[command(name = "docfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and print the feed for a source bundle
    Feed {
        /// Source bundle (JSON)
        bundle: PathBuf,

        /// Content types to include (comma-separated: note,annotation,relationship,search)
        #[arg(short, long)]
        types: Option<String>,

        /// Only annotations with these labels (comma-separated)
        #[arg(short, long)]
        labels: Option<String>,

        /// Hide structural annotations and relationships
        #[arg(long)]
        hide_structural: bool,

        /// Case-insensitive text filter
        #[arg(short, long)]
        query: Option<String>,

        /// Sort order
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,

        /// Render as read-only (no select/edit/delete)
        #[arg(long)]
        read_only: bool,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the annotation labels present in a source bundle
    Labels {
        /// Source bundle (JSON)
        bundle: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Sort order for CLI (maps to SortOption)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Page,
    Type,
    Date,
}

impl From<SortArg> for SortOption {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Page => SortOption::Page,
            SortArg::Type => SortOption::Type,
            SortArg::Date => SortOption::Date,
        }
    }
}

/// Feed flags as given on the command line
#[derive(Debug, Default)]
struct FeedArgs {
    types: Option<String>,
    labels: Option<String>,
    hide_structural: bool,
    query: Option<String>,
    sort: Option<SortArg>,
    read_only: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Feed {
                bundle,
                types,
                labels,
                hide_structural,
                query,
                sort,
                read_only,
                json,
            } => {
                let args = FeedArgs {
                    types,
                    labels,
                    hide_structural,
                    query,
                    sort,
                    read_only,
                };
                show_feed(&bundle, args, json).await
            }
            Commands::Labels { bundle } => list_labels(&bundle).await,
            Commands::Config => show_config().await,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Layer command-line flags over configured defaults
fn apply_args(mut options: FeedOptions, args: FeedArgs) -> Result<FeedOptions> {
    if let Some(types) = args.types {
        options.filters.content_types = split_list(&types)
            .iter()
            .map(|t| t.parse::<ContentItemType>())
            .collect::<Result<BTreeSet<_>>>()
            .context("Invalid --types")?;
    }
    if let Some(labels) = args.labels {
        options.filters = options.filters.with_labels(split_list(&labels));
    }
    if args.hide_structural {
        options.filters = options
            .filters
            .show_structural_annotations(false)
            .show_structural_relationships(false);
    }
    if let Some(query) = args.query {
        options.filters = options.filters.with_query(query);
    }
    if let Some(sort) = args.sort {
        options.sort_by = sort.into();
    }
    if args.read_only {
        options.read_only = true;
    }
    Ok(options)
}

async fn load_bundle(path: &Path) -> Result<SourceBundle> {
    let bundle = SourceBundle::load(path).await?;
    if bundle.report.dropped > 0 {
        warn!(
            "Dropped {} malformed or unknown records from {}",
            bundle.report.dropped,
            path.display()
        );
    }
    Ok(bundle)
}

/// Build and print the feed
async fn show_feed(path: &Path, args: FeedArgs, json: bool) -> Result<()> {
    let bundle = load_bundle(path).await?;
    let options = apply_args(config::config()?.feed_options(), args)?;

    let feed = build_feed(&bundle.sources, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    if feed.is_empty {
        println!("No items match the current filters.");
        return Ok(());
    }

    for group in &feed.groups {
        println!("\n{}", group.key);
        println!("{}", "-".repeat(80));
        for entry in &group.items {
            println!(
                "{:<14} {:<24} {:<5} {}",
                entry.item.content_type().to_string(),
                truncate(&entry.item.id, 24),
                capability_flags(entry),
                truncate(&summary(entry), 34)
            );
        }
    }

    println!("\nTotal: {} items", feed.total_count);

    Ok(())
}

/// One-line summary of an entry for the text listing
fn summary(entry: &FeedEntry) -> String {
    let text = match &entry.item.data {
        ItemData::Note(note) => note.title.clone().unwrap_or_else(|| note.content.clone()),
        ItemData::Annotation(annotation) => {
            format!("[{}] {}", annotation.label.text, annotation.raw_text)
        }
        ItemData::Relationship(relationship) => format!(
            "{} ({} → {})",
            relationship.label.text,
            relationship.source_ids.len(),
            relationship.target_ids.len()
        ),
        ItemData::Search(hit) => hit.text.clone(),
    };
    text.replace('\n', " ")
}

/// Compact capability flags: s=select, e=edit, d=delete
fn capability_flags(entry: &FeedEntry) -> String {
    let caps = entry.capabilities;
    [
        (caps.selectable, 's'),
        (caps.editable, 'e'),
        (caps.deletable, 'd'),
    ]
    .iter()
    .map(|(on, c)| if *on { *c } else { '-' })
    .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// List distinct annotation labels
async fn list_labels(path: &Path) -> Result<()> {
    let bundle = load_bundle(path).await?;
    let labels = available_labels(&bundle.sources);

    if labels.is_empty() {
        println!("No annotation labels in {}", path.display());
        return Ok(());
    }

    for label in &labels {
        println!("{}", label);
    }
    println!("\nTotal: {} labels", labels.len());

    Ok(())
}

/// Show resolved configuration
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("docfeed configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Feed defaults:");
    println!("  Sort:      {}", cfg.sort_by);
    println!("  Read-only: {}", cfg.read_only);
    println!();
    println!("Filters:");
    let types: Vec<_> = cfg
        .filters
        .content_types
        .iter()
        .map(|t| t.as_str())
        .collect();
    println!(
        "  Content types:           {}",
        if types.is_empty() {
            "(none)".to_string()
        } else {
            types.join(", ")
        }
    );
    println!(
        "  Labels:                  {}",
        match &cfg.filters.annotation_filters.labels {
            Some(labels) => labels.iter().cloned().collect::<Vec<_>>().join(", "),
            None => "(all)".to_string(),
        }
    );
    println!(
        "  Structural annotations:  {}",
        cfg.filters.annotation_filters.show_structural
    );
    println!(
        "  Structural relationships: {}",
        cfg.filters.relationship_filters.show_structural
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_args_overrides_defaults() {
        let args = FeedArgs {
            types: Some("note, annotation".to_string()),
            labels: Some("Important,Party".to_string()),
            hide_structural: true,
            query: Some("acme".to_string()),
            sort: Some(SortArg::Date),
            read_only: true,
        };

        let options = apply_args(FeedOptions::default(), args).unwrap();
        assert_eq!(options.filters.content_types.len(), 2);
        assert_eq!(
            options.filters.annotation_filters.labels.as_ref().map(|l| l.len()),
            Some(2)
        );
        assert!(!options.filters.annotation_filters.show_structural);
        assert!(!options.filters.relationship_filters.show_structural);
        assert_eq!(options.filters.search_query.as_deref(), Some("acme"));
        assert_eq!(options.sort_by, SortOption::Date);
        assert!(options.read_only);
    }

    #[test]
    fn test_apply_args_keeps_defaults_when_absent() {
        let options = apply_args(FeedOptions::default(), FeedArgs::default()).unwrap();
        assert_eq!(options, FeedOptions::default());
    }

    #[test]
    fn test_unknown_type_flag_rejected() {
        let args = FeedArgs {
            types: Some("note,comment".to_string()),
            ..Default::default()
        };
        assert!(apply_args(FeedOptions::default(), args).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer string", 10), "a much ...");
    }
}
