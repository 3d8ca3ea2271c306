//! Source records the feed aggregates.
//!
//! These are owned by external collaborators (note store, annotation store,
//! relationship store, search layer); the feed only reads them.

pub mod annotation;
pub mod note;
pub mod relationship;
pub mod search;
pub mod sources;

pub use annotation::{Annotation, AnnotationKind, Label};
pub use note::{Creator, Note};
pub use relationship::RelationGroup;
pub use search::SearchResult;
pub use sources::{LoadReport, SourceBundle, SourceCollections};
