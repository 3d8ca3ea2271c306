//! Feed assembly: normalize → filter → arrange → gate.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use super::arrange::{arrange, FeedGroup, SortOption};
use super::capability::{gate_one, FeedEntry};
use super::filter::{filter, filter_refs, ContentFilters};
use super::item::{ContentItemType, UnifiedContentItem};
use super::normalize::normalize;
use crate::domain::SourceCollections;

/// UI-state inputs of a feed build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedOptions {
    pub filters: ContentFilters,
    pub sort_by: SortOption,
    pub read_only: bool,
    /// Passed through untouched; the renderer shows a loading state instead
    pub is_loading: bool,
}

impl FeedOptions {
    pub fn new(filters: ContentFilters, sort_by: SortOption) -> Self {
        Self {
            filters,
            sort_by,
            ..Default::default()
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }
}

/// Render-ready output of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedViewModel {
    pub groups: Vec<FeedGroup<FeedEntry>>,

    /// Items after filtering, before any windowing
    pub total_count: usize,

    pub is_empty: bool,
    pub is_loading: bool,
    pub read_only: bool,
}

impl FeedViewModel {
    /// Entries in display order
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    /// Look up an entry by its feed-wide key (`<type>:<id>`)
    pub fn find(&self, key: &str) -> Option<&FeedEntry> {
        self.entries().find(|entry| entry.item.key() == key)
    }

    /// Visible item count per type
    pub fn counts_by_type(&self) -> BTreeMap<ContentItemType, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries() {
            *counts.entry(entry.item.content_type()).or_insert(0) += 1;
        }
        counts
    }
}

/// Build the feed from raw sources
pub fn build_feed(sources: &SourceCollections, options: &FeedOptions) -> FeedViewModel {
    let normalized = normalize(sources);
    debug!("Normalized {} source records", normalized.len());

    let filtered = filter(normalized, &options.filters);
    assemble(filtered, options)
}

/// Build the feed from an already-normalized sequence
pub fn build_feed_from_normalized(
    normalized: &[UnifiedContentItem],
    options: &FeedOptions,
) -> FeedViewModel {
    let filtered = filter_refs(normalized, &options.filters);
    assemble(filtered, options)
}

fn assemble(filtered: Vec<UnifiedContentItem>, options: &FeedOptions) -> FeedViewModel {
    let total_count = filtered.len();
    let read_only = options.read_only;

    let groups: Vec<FeedGroup<FeedEntry>> = arrange(filtered, options.sort_by)
        .into_iter()
        .map(|group| group.map(|item| gate_one(item, read_only)))
        .collect();

    debug!(
        "Feed built: {} items in {} groups (sort={}, read_only={})",
        total_count,
        groups.len(),
        options.sort_by,
        read_only
    );

    FeedViewModel {
        groups,
        total_count,
        is_empty: total_count == 0,
        is_loading: options.is_loading,
        read_only,
    }
}

/// Distinct annotation label names, sorted, for the label filter picker
pub fn available_labels(sources: &SourceCollections) -> Vec<String> {
    sources
        .annotations
        .iter()
        .map(|annotation| annotation.label.text.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
