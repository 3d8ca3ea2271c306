//! Filter engine: a pure predicate pipeline over normalized items.
//!
//! Per item, in order (short-circuiting):
//! 1. type must be in `content_types`
//! 2. annotations: structural gate, then label membership
//! 3. relationships: structural gate
//! 4. non-blank query must be a case-insensitive substring of the item text

use std::collections::BTreeSet;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::item::{ContentItemType, ItemData, UnifiedContentItem};

/// Annotation-specific filter axes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationFilters {
    /// When set, only annotations whose label text is a member pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeSet<String>>,

    #[serde(default = "default_true")]
    pub show_structural: bool,
}

impl Default for AnnotationFilters {
    fn default() -> Self {
        Self {
            labels: None,
            show_structural: true,
        }
    }
}

/// Relationship-specific filter axes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipFilters {
    #[serde(default = "default_true")]
    pub show_structural: bool,
}

impl Default for RelationshipFilters {
    fn default() -> Self {
        Self {
            show_structural: true,
        }
    }
}

/// Everything the filter engine reduces by.
///
/// `Default` is "no filter configured": every type, every label,
/// structural records shown, no query. An empty `content_types` set is
/// not the same thing and yields an empty feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilters {
    #[serde(
        default = "all_content_types",
        deserialize_with = "deserialize_content_types"
    )]
    pub content_types: BTreeSet<ContentItemType>,

    #[serde(default)]
    pub annotation_filters: AnnotationFilters,

    #[serde(default)]
    pub relationship_filters: RelationshipFilters,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl Default for ContentFilters {
    fn default() -> Self {
        Self {
            content_types: all_content_types(),
            annotation_filters: AnnotationFilters::default(),
            relationship_filters: RelationshipFilters::default(),
            search_query: None,
        }
    }
}

impl ContentFilters {
    /// Filters that admit only the given types
    pub fn only(types: impl IntoIterator<Item = ContentItemType>) -> Self {
        Self {
            content_types: types.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation_filters.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn show_structural_annotations(mut self, show: bool) -> Self {
        self.annotation_filters.show_structural = show;
        self
    }

    pub fn show_structural_relationships(mut self, show: bool) -> Self {
        self.relationship_filters.show_structural = show;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// The query to match against, lowercased; `None` when absent or blank
    pub fn normalized_query(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether a single item passes every configured axis
    pub fn matches(&self, item: &UnifiedContentItem) -> bool {
        self.matches_with_query(item, self.normalized_query().as_deref())
    }

    fn matches_with_query(&self, item: &UnifiedContentItem, query: Option<&str>) -> bool {
        if !self.content_types.contains(&item.content_type()) {
            return false;
        }

        match &item.data {
            ItemData::Annotation(annotation) => {
                if annotation.structural && !self.annotation_filters.show_structural {
                    return false;
                }
                if let Some(labels) = &self.annotation_filters.labels {
                    if !labels.contains(&annotation.label.text) {
                        return false;
                    }
                }
            }
            ItemData::Relationship(relationship) => {
                if relationship.structural && !self.relationship_filters.show_structural {
                    return false;
                }
            }
            ItemData::Note(_) | ItemData::Search(_) => {}
        }

        match query {
            Some(query) => item.text_representation().to_lowercase().contains(query),
            None => true,
        }
    }
}

/// Reduce `items` to those passing `filters`, preserving order
pub fn filter(items: Vec<UnifiedContentItem>, filters: &ContentFilters) -> Vec<UnifiedContentItem> {
    let query = filters.normalized_query();
    items
        .into_iter()
        .filter(|item| filters.matches_with_query(item, query.as_deref()))
        .collect()
}

/// Borrowing variant of [`filter`]: only passing items are cloned
pub fn filter_refs(
    items: &[UnifiedContentItem],
    filters: &ContentFilters,
) -> Vec<UnifiedContentItem> {
    let query = filters.normalized_query();
    items
        .iter()
        .filter(|item| filters.matches_with_query(item, query.as_deref()))
        .cloned()
        .collect()
}

fn all_content_types() -> BTreeSet<ContentItemType> {
    ContentItemType::ALL.into_iter().collect()
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseTypeList {
    List(Vec<LooseTypeEntry>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseTypeEntry {
    Name(String),
    Other(IgnoredAny),
}

/// Fail closed: a value that is not a list admits nothing, unknown names are skipped
fn deserialize_content_types<'de, D>(deserializer: D) -> Result<BTreeSet<ContentItemType>, D::Error>
where
    D: Deserializer<'de>,
{
    let types = match LooseTypeList::deserialize(deserializer)? {
        LooseTypeList::List(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                LooseTypeEntry::Name(name) => name.parse().ok(),
                LooseTypeEntry::Other(_) => None,
            })
            .collect(),
        LooseTypeList::Other(_) => BTreeSet::new(),
    };
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, Label, Note, RelationGroup, SearchResult, SourceCollections};
    use crate::feed::normalize;
    use chrono::{TimeZone, Utc};

    fn sample_items() -> Vec<UnifiedContentItem> {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sources = SourceCollections::new()
            .with_notes(vec![
                Note::new("n1", "Quarterly revenue grew", "a@example.com", created)
                    .with_title("Finance"),
            ])
            .with_annotations(vec![
                Annotation::new("a1", Label::new("Important", "#f00"), "Termination clause"),
                Annotation::new("a2", Label::new("Header", "#999"), "Section 4").structural(true),
                Annotation::new("a3", Label::new("Party", "#0f0"), "Acme Corp"),
            ])
            .with_relationships(vec![
                RelationGroup::new(
                    "r1",
                    vec!["a1".into()],
                    vec!["a3".into()],
                    Label::new("binds", ""),
                ),
                RelationGroup::new("r2", vec![], vec![], Label::new("layout", "")).structural(true),
            ])
            .with_search_results(vec![SearchResult::new("revenue").on_page(2)]);
        normalize(&sources)
    }

    fn ids(items: &[UnifiedContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_default_filters_pass_everything() {
        let items = sample_items();
        let filtered = filter(items.clone(), &ContentFilters::default());
        assert_eq!(filtered, items);
    }

    #[test]
    fn test_empty_content_types_yields_nothing() {
        let filtered = filter(sample_items(), &ContentFilters::only([]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_type_filter() {
        let filtered = filter(
            sample_items(),
            &ContentFilters::only([ContentItemType::Relationship]),
        );
        assert_eq!(ids(&filtered), vec!["r1", "r2"]);
    }

    #[test]
    fn test_structural_annotations_hidden() {
        let filters = ContentFilters::only([ContentItemType::Annotation])
            .show_structural_annotations(false);
        let filtered = filter(sample_items(), &filters);
        assert_eq!(ids(&filtered), vec!["a1", "a3"]);
    }

    #[test]
    fn test_structural_relationships_hidden_independently() {
        let filters = ContentFilters::default().show_structural_relationships(false);
        let filtered = filter(sample_items(), &filters);
        assert!(filtered.iter().any(|i| i.id == "a2"));
        assert!(!filtered.iter().any(|i| i.id == "r2"));
    }

    #[test]
    fn test_label_filter_only_affects_annotations() {
        let filters = ContentFilters::default().with_labels(["Important", "Header"]);
        let filtered = filter(sample_items(), &filters);
        assert_eq!(ids(&filtered), vec!["n1", "a1", "a2", "r1", "r2", "search-0"]);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let filters = ContentFilters::default().with_query("REVENUE");
        let filtered = filter(sample_items(), &filters);
        assert_eq!(ids(&filtered), vec!["n1", "search-0"]);

        let filters = ContentFilters::default().with_query("finance");
        assert_eq!(ids(&filter(sample_items(), &filters)), vec!["n1"]);

        let filters = ContentFilters::default().with_query("Binds");
        assert_eq!(ids(&filter(sample_items(), &filters)), vec!["r1"]);
    }

    #[test]
    fn test_blank_query_is_no_filter() {
        let filters = ContentFilters::default().with_query("   ");
        assert_eq!(filters.normalized_query(), None);
        assert_eq!(filter(sample_items(), &filters).len(), sample_items().len());
    }

    #[test]
    fn test_query_trimmed_before_matching() {
        let filters = ContentFilters::default().with_query("  acme ");
        assert_eq!(ids(&filter(sample_items(), &filters)), vec!["a3"]);
    }

    #[test]
    fn test_filter_refs_matches_filter() {
        let items = sample_items();
        let filters = ContentFilters::default().with_query("e");
        assert_eq!(filter_refs(&items, &filters), filter(items.clone(), &filters));
    }

    #[test]
    fn test_missing_content_types_means_all() {
        let filters: ContentFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters, ContentFilters::default());
    }

    #[test]
    fn test_malformed_content_types_fail_closed() {
        let filters: ContentFilters =
            serde_json::from_str(r#"{"contentTypes": "note"}"#).unwrap();
        assert!(filters.content_types.is_empty());

        let filters: ContentFilters =
            serde_json::from_str(r#"{"contentTypes": {"note": true}}"#).unwrap();
        assert!(filters.content_types.is_empty());
    }

    #[test]
    fn test_unknown_content_type_entries_skipped() {
        let filters: ContentFilters =
            serde_json::from_str(r#"{"contentTypes": ["note", "comment", 7, "search"]}"#).unwrap();
        let expected: BTreeSet<_> = [ContentItemType::Note, ContentItemType::Search].into();
        assert_eq!(filters.content_types, expected);
    }

    #[test]
    fn test_filters_wire_shape() {
        let json = r#"{
            "contentTypes": ["annotation"],
            "annotationFilters": {"labels": ["Important"], "showStructural": false},
            "relationshipFilters": {"showStructural": false},
            "searchQuery": "clause"
        }"#;
        let filters: ContentFilters = serde_json::from_str(json).unwrap();
        assert!(!filters.annotation_filters.show_structural);
        assert!(!filters.relationship_filters.show_structural);
        assert_eq!(filters.search_query.as_deref(), Some("clause"));
        assert_eq!(ids(&filter(sample_items(), &filters)), vec!["a1"]);
    }
}
