//! Source collections and the on-disk bundle loader.
//!
//! The feed reads four independent collections. A bundle file holds them as
//! JSON in one of two shapes:
//!
//! ```text
//! { "notes": [...], "annotations": [...], "relationships": [...], "searchResults": [...] }
//! [ { "type": "note", ... }, { "type": "annotation", ... }, ... ]
//! ```
//!
//! Records that fail to parse, or carry an unknown `type` tag, are dropped
//! and counted rather than failing the whole load.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::warn;

use super::{Annotation, Note, RelationGroup, SearchResult};
use crate::feed::ContentItemType;

/// The four read-only inputs of the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCollections {
    #[serde(default)]
    pub notes: Vec<Note>,

    #[serde(default)]
    pub annotations: Vec<Annotation>,

    #[serde(default)]
    pub relationships: Vec<RelationGroup>,

    #[serde(default, alias = "search")]
    pub search_results: Vec<SearchResult>,
}

impl SourceCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<RelationGroup>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_search_results(mut self, search_results: Vec<SearchResult>) -> Self {
        self.search_results = search_results;
        self
    }

    /// Total number of source records across all collections
    pub fn len(&self) -> usize {
        self.notes.len()
            + self.annotations.len()
            + self.relationships.len()
            + self.search_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a lenient load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records accepted into the collections
    pub accepted: usize,

    /// Records dropped (unknown type tag or malformed)
    pub dropped: usize,
}

/// A loaded bundle: sources plus what was dropped on the way in
#[derive(Debug, Clone, Default)]
pub struct SourceBundle {
    pub sources: SourceCollections,
    pub report: LoadReport,
}

impl SourceBundle {
    /// Load a bundle file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read source bundle: {}", path.display()))?;

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse source bundle JSON: {}", path.display()))?;

        Self::from_value(value)
    }

    /// Build a bundle from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(records) => Ok(Self::from_tagged_records(records)),
            Value::Object(mut map) => {
                let notes = take_collection(&mut map, &["notes"]);
                let annotations = take_collection(&mut map, &["annotations"]);
                let relationships = take_collection(&mut map, &["relationships"]);
                let search = take_collection(&mut map, &["searchResults", "search"]);

                let mut bundle = Self::default();
                bundle.sources.notes = parse_each(notes, &mut bundle.report);
                bundle.sources.annotations = parse_each(annotations, &mut bundle.report);
                bundle.sources.relationships = parse_each(relationships, &mut bundle.report);
                bundle.sources.search_results = parse_each(search, &mut bundle.report);

                Ok(bundle)
            }
            other => anyhow::bail!(
                "Source bundle must be a JSON object or array, got {}",
                json_kind(&other)
            ),
        }
    }

    /// Sort `type`-tagged records into their collections.
    ///
    /// Source order within each kind is preserved.
    pub fn from_tagged_records(records: Vec<Value>) -> Self {
        let mut bundle = Self::default();

        for record in records {
            let kind = record
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<ContentItemType>().ok());

            let Some(kind) = kind else {
                let tag = record.get("type").cloned().unwrap_or(Value::Null);
                warn!("Dropping source record with unknown type: {}", tag);
                bundle.report.dropped += 1;
                continue;
            };

            let sources = &mut bundle.sources;
            let report = &mut bundle.report;
            match kind {
                ContentItemType::Note => push_parsed(&mut sources.notes, record, report),
                ContentItemType::Annotation => {
                    push_parsed(&mut sources.annotations, record, report)
                }
                ContentItemType::Relationship => {
                    push_parsed(&mut sources.relationships, record, report)
                }
                ContentItemType::Search => {
                    push_parsed(&mut sources.search_results, record, report)
                }
            }
        }

        bundle
    }
}

/// Remove the first present key and return its entries
fn take_collection(map: &mut Map<String, Value>, keys: &[&str]) -> Vec<Value> {
    keys.iter()
        .find_map(|k| map.remove(*k))
        .map(collection_entries)
        .unwrap_or_default()
}

fn collection_entries(value: Value) -> Vec<Value> {
    match value {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => {
            warn!("Ignoring source collection that is not a list ({})", json_kind(&other));
            Vec::new()
        }
    }
}

fn parse_each<T: DeserializeOwned>(values: Vec<Value>, report: &mut LoadReport) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        push_parsed(&mut out, value, report);
    }
    out
}

fn push_parsed<T: DeserializeOwned>(out: &mut Vec<T>, value: Value, report: &mut LoadReport) {
    match serde_json::from_value::<T>(value) {
        Ok(record) => {
            out.push(record);
            report.accepted += 1;
        }
        Err(e) => {
            warn!("Dropping malformed source record: {}", e);
            report.dropped += 1;
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
