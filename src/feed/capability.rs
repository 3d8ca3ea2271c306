//! Capability gate.
//!
//! Advertises which interactions are legal per item. It never hides or
//! reorders anything; enforcement is left to the caller.

use serde::{Deserialize, Serialize};

use super::item::{ContentItemType, UnifiedContentItem};

/// Interactions an item exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub selectable: bool,
    pub editable: bool,
    pub deletable: bool,
}

impl Capabilities {
    /// Nothing allowed
    pub const NONE: Capabilities = Capabilities {
        selectable: false,
        editable: false,
        deletable: false,
    };

    /// The most a type supports in an editable document.
    ///
    /// Annotation editing and relationship edit/delete are handled by
    /// other collaborators, so they are not advertised here.
    pub fn max_for(content_type: ContentItemType) -> Self {
        match content_type {
            ContentItemType::Note => Capabilities {
                selectable: true,
                editable: true,
                deletable: true,
            },
            ContentItemType::Annotation => Capabilities {
                selectable: true,
                editable: false,
                deletable: true,
            },
            ContentItemType::Relationship | ContentItemType::Search => Capabilities {
                selectable: true,
                editable: false,
                deletable: false,
            },
        }
    }

    pub fn for_item(content_type: ContentItemType, read_only: bool) -> Self {
        if read_only {
            Self::NONE
        } else {
            Self::max_for(content_type)
        }
    }
}

/// An item paired with its advertised capabilities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub item: UnifiedContentItem,
    pub capabilities: Capabilities,
}

/// Attach capabilities to every item, in order
pub fn gate(items: Vec<UnifiedContentItem>, read_only: bool) -> Vec<FeedEntry> {
    items
        .into_iter()
        .map(|item| gate_one(item, read_only))
        .collect()
}

pub(crate) fn gate_one(item: UnifiedContentItem, read_only: bool) -> FeedEntry {
    let capabilities = Capabilities::for_item(item.content_type(), read_only);
    FeedEntry { item, capabilities }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, Label, RelationGroup, SearchResult, SourceCollections};
    use crate::feed::normalize;

    fn mixed_items() -> Vec<UnifiedContentItem> {
        let sources = SourceCollections::new()
            .with_annotations(vec![Annotation::new("a1", Label::new("L", ""), "x")])
            .with_relationships(vec![RelationGroup::new("r1", vec![], vec![], Label::new("R", ""))])
            .with_search_results(vec![SearchResult::new("hit")]);
        normalize(&sources)
    }

    #[test]
    fn test_editable_document_capabilities() {
        let entries = gate(mixed_items(), false);

        assert_eq!(
            entries[0].capabilities,
            Capabilities {
                selectable: true,
                editable: false,
                deletable: true,
            }
        );
        assert_eq!(
            entries[1].capabilities,
            Capabilities {
                selectable: true,
                editable: false,
                deletable: false,
            }
        );
        assert!(entries[2].capabilities.selectable);
        assert_eq!(
            Capabilities::max_for(ContentItemType::Note),
            Capabilities {
                selectable: true,
                editable: true,
                deletable: true,
            }
        );
    }

    #[test]
    fn test_read_only_disables_everything_without_hiding() {
        let items = mixed_items();
        let entries = gate(items.clone(), true);

        assert_eq!(entries.len(), items.len());
        for (entry, item) in entries.iter().zip(&items) {
            assert_eq!(&entry.item, item);
            assert_eq!(entry.capabilities, Capabilities::NONE);
        }
    }
}
