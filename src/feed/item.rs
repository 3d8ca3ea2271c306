//! The unified content item envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Annotation, Note, RelationGroup, SearchResult};

/// Kind of content in the feed.
///
/// Variant order is the canonical aggregation order and drives `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentItemType {
    Note,
    Annotation,
    Relationship,
    Search,
}

impl ContentItemType {
    /// All types in canonical order
    pub const ALL: [ContentItemType; 4] = [
        ContentItemType::Note,
        ContentItemType::Annotation,
        ContentItemType::Relationship,
        ContentItemType::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentItemType::Note => "note",
            ContentItemType::Annotation => "annotation",
            ContentItemType::Relationship => "relationship",
            ContentItemType::Search => "search",
        }
    }

    /// Plural display name for section headers
    pub fn plural(&self) -> &'static str {
        match self {
            ContentItemType::Note => "Notes",
            ContentItemType::Annotation => "Annotations",
            ContentItemType::Relationship => "Relationships",
            ContentItemType::Search => "Search results",
        }
    }
}

impl std::fmt::Display for ContentItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentItemType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "note" | "notes" => Ok(ContentItemType::Note),
            "annotation" | "annotations" => Ok(ContentItemType::Annotation),
            "relationship" | "relationships" => Ok(ContentItemType::Relationship),
            "search" | "search_result" | "searchresult" => Ok(ContentItemType::Search),
            _ => anyhow::bail!("Unknown content type: {}", s),
        }
    }
}

/// The untouched source record behind an item.
///
/// The variant doubles as the item's type, so an envelope can never carry
/// fields from two kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ItemData {
    Note(Note),
    Annotation(Annotation),
    Relationship(RelationGroup),
    Search(SearchResult),
}

impl ItemData {
    pub fn content_type(&self) -> ContentItemType {
        match self {
            ItemData::Note(_) => ContentItemType::Note,
            ItemData::Annotation(_) => ContentItemType::Annotation,
            ItemData::Relationship(_) => ContentItemType::Relationship,
            ItemData::Search(_) => ContentItemType::Search,
        }
    }
}

/// One normalized record in the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedContentItem {
    pub id: String,

    /// 1-based page the item is grouped under
    pub page_number: u32,

    #[serde(flatten)]
    pub data: ItemData,

    /// Secondary sort key for date ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl UnifiedContentItem {
    pub fn content_type(&self) -> ContentItemType {
        self.data.content_type()
    }

    /// Feed-wide unique key, e.g. `annotation:42`.
    ///
    /// Raw ids are only unique within one kind.
    pub fn key(&self) -> String {
        format!("{}:{}", self.content_type(), self.id)
    }

    /// Text the free-text query is matched against
    pub fn text_representation(&self) -> String {
        match &self.data {
            ItemData::Note(note) => match &note.title {
                Some(title) => format!("{}\n{}", title, note.content),
                None => note.content.clone(),
            },
            ItemData::Annotation(annotation) => annotation.raw_text.clone(),
            ItemData::Relationship(relationship) => relationship.label.text.clone(),
            ItemData::Search(hit) => hit.text.clone(),
        }
    }

    /// Whether the underlying record is flagged structural (notes and search hits never are)
    pub fn is_structural(&self) -> bool {
        match &self.data {
            ItemData::Annotation(annotation) => annotation.structural,
            ItemData::Relationship(relationship) => relationship.structural,
            ItemData::Note(_) | ItemData::Search(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;

    #[test]
    fn test_content_type_parsing() {
        assert_eq!("note".parse::<ContentItemType>().unwrap(), ContentItemType::Note);
        assert_eq!(
            "Annotations".parse::<ContentItemType>().unwrap(),
            ContentItemType::Annotation
        );
        assert_eq!(" search ".parse::<ContentItemType>().unwrap(), ContentItemType::Search);
        assert!("comment".parse::<ContentItemType>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let mut types = vec![
            ContentItemType::Search,
            ContentItemType::Note,
            ContentItemType::Relationship,
            ContentItemType::Annotation,
        ];
        types.sort();
        assert_eq!(types, ContentItemType::ALL.to_vec());
    }

    #[test]
    fn test_key_disambiguates_kinds() {
        let item = UnifiedContentItem {
            id: "1".to_string(),
            page_number: 1,
            data: ItemData::Annotation(Annotation::new("1", Label::new("L", ""), "x")),
            timestamp: None,
        };
        assert_eq!(item.key(), "annotation:1");
    }

    #[test]
    fn test_item_serializes_with_type_tag() {
        let item = UnifiedContentItem {
            id: "search-0".to_string(),
            page_number: 4,
            data: ItemData::Search(SearchResult::new("hit")),
            timestamp: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "search");
        assert_eq!(json["pageNumber"], 4);
        assert_eq!(json["data"]["text"], "hit");
        assert!(json.get("timestamp").is_none());
    }
}
