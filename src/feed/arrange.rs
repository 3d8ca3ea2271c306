//! Sort/group engine.
//!
//! Orders filtered items by a [`SortOption`] and partitions them into
//! header-labelled groups. Every ordering uses a stable sort, so ties keep
//! their normalized (aggregation) order and repeated runs are identical.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::item::{ContentItemType, UnifiedContentItem};

/// How the feed is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Page ascending, grouped per page
    #[default]
    Page,

    /// Canonical type order, then page; grouped per (type, page)
    Type,

    /// Newest first, undated last; a single ungrouped list
    Date,
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOption::Page => write!(f, "page"),
            SortOption::Type => write!(f, "type"),
            SortOption::Date => write!(f, "date"),
        }
    }
}

impl std::str::FromStr for SortOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "page" => Ok(SortOption::Page),
            "type" => Ok(SortOption::Type),
            "date" => Ok(SortOption::Date),
            _ => anyhow::bail!("Unknown sort option: {}", s),
        }
    }
}

/// Section header key for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupKey {
    Page {
        page_number: u32,
    },
    Type {
        content_type: ContentItemType,
        page_number: u32,
    },
    /// Ungrouped (date ordering)
    All,
}

impl GroupKey {
    /// Header text for the renderer
    pub fn label(&self) -> String {
        match self {
            GroupKey::Page { page_number } => format!("Page {}", page_number),
            GroupKey::Type {
                content_type,
                page_number,
            } => format!("{} · Page {}", content_type.plural(), page_number),
            GroupKey::All => "All items".to_string(),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An ordered run of items under one header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedGroup<T> {
    pub key: GroupKey,
    pub items: Vec<T>,
}

impl<T> FeedGroup<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform every item while keeping key and order
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> FeedGroup<U> {
        FeedGroup {
            key: self.key,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Order and group items for display
pub fn arrange(
    mut items: Vec<UnifiedContentItem>,
    sort_by: SortOption,
) -> Vec<FeedGroup<UnifiedContentItem>> {
    if items.is_empty() {
        return Vec::new();
    }

    match sort_by {
        SortOption::Page => {
            items.sort_by_key(|item| item.page_number);
            group_consecutive(items, |item| GroupKey::Page {
                page_number: item.page_number,
            })
        }
        SortOption::Type => {
            items.sort_by_key(|item| (item.content_type(), item.page_number));
            group_consecutive(items, |item| GroupKey::Type {
                content_type: item.content_type(),
                page_number: item.page_number,
            })
        }
        SortOption::Date => {
            items.sort_by(|a, b| newest_first(a, b));
            vec![FeedGroup {
                key: GroupKey::All,
                items,
            }]
        }
    }
}

/// Timestamp descending; undated items after all dated ones
fn newest_first(a: &UnifiedContentItem, b: &UnifiedContentItem) -> Ordering {
    match (&a.timestamp, &b.timestamp) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Split an already-sorted sequence wherever the key changes
fn group_consecutive<T>(items: Vec<T>, key_of: impl Fn(&T) -> GroupKey) -> Vec<FeedGroup<T>> {
    let mut groups: Vec<FeedGroup<T>> = Vec::new();

    for item in items {
        let key = key_of(&item);
        match groups.last_mut() {
            Some(group) if group.key == key => group.items.push(item),
            _ => groups.push(FeedGroup {
                key,
                items: vec![item],
            }),
        }
    }

    groups
}
