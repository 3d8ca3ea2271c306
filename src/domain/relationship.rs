//! Relationship links between annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::annotation::Label;

/// A labelled link from one set of annotations to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationGroup {
    pub id: String,

    /// Annotation ids on the source side
    #[serde(default)]
    pub source_ids: Vec<String>,

    /// Annotation ids on the target side
    #[serde(default)]
    pub target_ids: Vec<String>,

    pub label: Label,

    #[serde(default)]
    pub structural: bool,

    /// Page of the first source annotation, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl RelationGroup {
    pub fn new(
        id: impl Into<String>,
        source_ids: Vec<String>,
        target_ids: Vec<String>,
        label: Label,
    ) -> Self {
        Self {
            id: id.into(),
            source_ids,
            target_ids,
            label,
            structural: false,
            page: None,
            created: None,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn structural(mut self, structural: bool) -> Self {
        self.structural = structural;
        self
    }

    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}
