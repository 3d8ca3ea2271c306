//! The unified content feed.
//!
//! Raw sources flow one way through pure stages:
//!
//! ```text
//! SourceCollections
//!   → normalize   (tag + level into UnifiedContentItem)
//!   → filter      (ContentFilters)
//!   → arrange     (SortOption, page/type groups)
//!   → gate        (read-only capabilities)
//!   → FeedViewModel
//! ```
//!
//! No stage mutates its input or any source record, so the whole pipeline
//! can be memoized (see [`memo`]).

pub mod arrange;
pub mod capability;
pub mod filter;
pub mod item;
pub mod memo;
pub mod normalize;
pub mod select;
pub mod view_model;

pub use arrange::{arrange, FeedGroup, GroupKey, SortOption};
pub use capability::{gate, Capabilities, FeedEntry};
pub use filter::{filter, filter_refs, AnnotationFilters, ContentFilters, RelationshipFilters};
pub use item::{ContentItemType, ItemData, UnifiedContentItem};
pub use memo::{FeedMemo, MemoStats};
pub use normalize::normalize;
pub use select::{ItemSelectHandler, SelectError};
pub use view_model::{
    available_labels, build_feed, build_feed_from_normalized, FeedOptions, FeedViewModel,
};
