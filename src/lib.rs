//! docfeed - Unified content feed for annotated documents
//!
//! Merges notes, span/token annotations, relationship links, and text
//! search hits into one ordered, filterable, page-grouped list for a
//! virtualized renderer.
//!
//! # Architecture
//!
//! The feed is a pure, one-way pipeline:
//! - Sources are normalized into tagged `UnifiedContentItem`s
//! - Items are filtered by type, label, structural flag, and query
//! - The survivors are sorted and grouped by page or type
//! - A read-only gate attaches per-item capabilities
//!
//! Identical inputs always produce identical output, so builds can be
//! memoized with `FeedMemo`.
//!
//! # Modules
//!
//! - `domain`: Source records (Note, Annotation, RelationGroup, SearchResult)
//! - `feed`: The pipeline and its view model
//! - `config`: Default filters and sort order
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Print the feed for a bundle, newest first
//! docfeed feed bundle.json --sort date
//!
//! # Only important annotations mentioning "termination"
//! docfeed feed bundle.json --types annotation --labels Important -q termination
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod feed;

// Re-export main types at crate root for convenience
pub use domain::{
    Annotation, Label, LoadReport, Note, RelationGroup, SearchResult, SourceBundle,
    SourceCollections,
};
pub use feed::{
    build_feed, Capabilities, ContentFilters, ContentItemType, FeedEntry, FeedGroup, FeedMemo,
    FeedOptions, FeedViewModel, GroupKey, SortOption, UnifiedContentItem,
};
