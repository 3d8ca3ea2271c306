//! Pre-computed text search hits.

use serde::{Deserialize, Serialize};

/// A single token or span match produced by the external search layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Identifier assigned by the search layer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Matched text (snippet)
    #[serde(alias = "snippet")]
    pub text: String,

    /// Start offset of the match in the document text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    /// End offset (exclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl SearchResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            page: None,
            text: text.into(),
            start: None,
            end: None,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_offsets(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}
