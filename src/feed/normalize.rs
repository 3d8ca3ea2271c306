//! Item normalization: four source collections in, one tagged sequence out.
//!
//! No filtering or sorting happens here. Output order is source order,
//! concatenated as notes, annotations, relationships, search hits.

use std::collections::HashSet;

use super::item::{ItemData, UnifiedContentItem};
use crate::domain::SourceCollections;

/// Page used for records without a page association
pub const DEFAULT_PAGE: u32 = 1;

/// Normalize all source collections into feed items
pub fn normalize(sources: &SourceCollections) -> Vec<UnifiedContentItem> {
    let mut items = Vec::with_capacity(sources.len());

    items.extend(sources.notes.iter().map(|note| UnifiedContentItem {
        id: note.id.clone(),
        page_number: page_or_default(note.page),
        timestamp: Some(note.created),
        data: ItemData::Note(note.clone()),
    }));

    items.extend(sources.annotations.iter().map(|annotation| UnifiedContentItem {
        id: annotation.id.clone(),
        page_number: page_or_default(annotation.page),
        timestamp: annotation.created,
        data: ItemData::Annotation(annotation.clone()),
    }));

    items.extend(sources.relationships.iter().map(|relationship| UnifiedContentItem {
        id: relationship.id.clone(),
        page_number: page_or_default(relationship.page),
        timestamp: relationship.created,
        data: ItemData::Relationship(relationship.clone()),
    }));

    let mut seen_search_ids = HashSet::new();
    for (index, hit) in sources.search_results.iter().enumerate() {
        let candidate = hit
            .id
            .clone()
            .unwrap_or_else(|| format!("search-{}", index));
        let id = unique_id(candidate, index, &seen_search_ids);
        seen_search_ids.insert(id.clone());

        items.push(UnifiedContentItem {
            id,
            page_number: page_or_default(hit.page),
            timestamp: None,
            data: ItemData::Search(hit.clone()),
        });
    }

    items
}

/// Suffix `-<index>`, then `-<index>-<n>`, until the id is unused
fn unique_id(candidate: String, index: usize, seen: &HashSet<String>) -> String {
    if !seen.contains(&candidate) {
        return candidate;
    }

    let base = format!("{}-{}", candidate, index);
    let mut id = base.clone();
    let mut n = 1;
    while seen.contains(&id) {
        id = format!("{}-{}", base, n);
        n += 1;
    }
    id
}

/// Missing and zero pages both map to the first page
fn page_or_default(page: Option<u32>) -> u32 {
    page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, Label, Note, RelationGroup, SearchResult};
    use crate::feed::ContentItemType;
    use chrono::{TimeZone, Utc};

    fn note(id: &str) -> Note {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Note::new(id, "content", "a@example.com", created)
    }

    #[test]
    fn test_canonical_concatenation_order() {
        let sources = SourceCollections::new()
            .with_search_results(vec![SearchResult::new("hit").on_page(2)])
            .with_relationships(vec![RelationGroup::new(
                "r1",
                vec!["a1".into()],
                vec!["a2".into()],
                Label::new("refs", ""),
            )])
            .with_annotations(vec![Annotation::new("a1", Label::new("L", ""), "x").on_page(3)])
            .with_notes(vec![note("n1"), note("n2")]);

        let items = normalize(&sources);
        let types: Vec<_> = items.iter().map(|i| i.content_type()).collect();
        assert_eq!(
            types,
            vec![
                ContentItemType::Note,
                ContentItemType::Note,
                ContentItemType::Annotation,
                ContentItemType::Relationship,
                ContentItemType::Search,
            ]
        );
        assert_eq!(items[0].id, "n1");
        assert_eq!(items[1].id, "n2");
    }

    #[test]
    fn test_missing_page_defaults_to_one() {
        let sources = SourceCollections::new()
            .with_notes(vec![note("n1"), note("n2").on_page(0), note("n3").on_page(5)]);

        let pages: Vec<_> = normalize(&sources).iter().map(|i| i.page_number).collect();
        assert_eq!(pages, vec![1, 1, 5]);
    }

    #[test]
    fn test_search_ids_synthesized_and_unique() {
        let sources = SourceCollections::new().with_search_results(vec![
            SearchResult::new("a"),
            SearchResult::new("b").with_id("m"),
            SearchResult::new("c").with_id("m"),
            SearchResult::new("d"),
        ]);

        let ids: Vec<_> = normalize(&sources).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["search-0", "m", "m-2", "search-3"]);
    }

    #[test]
    fn test_suffixed_search_id_does_not_collide() {
        let sources = SourceCollections::new().with_search_results(vec![
            SearchResult::new("a").with_id("m-2"),
            SearchResult::new("b").with_id("m"),
            SearchResult::new("c").with_id("m"),
        ]);

        let ids: Vec<_> = normalize(&sources).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["m-2", "m", "m-2-1"]);

        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn test_timestamps_carried_from_records() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let sources = SourceCollections::new()
            .with_annotations(vec![
                Annotation::new("a1", Label::new("L", ""), "x").created_at(created),
                Annotation::new("a2", Label::new("L", ""), "y"),
            ])
            .with_search_results(vec![SearchResult::new("hit")]);

        let items = normalize(&sources);
        assert_eq!(items[0].timestamp, Some(created));
        assert_eq!(items[1].timestamp, None);
        assert_eq!(items[2].timestamp, None);
    }

    #[test]
    fn test_empty_sources() {
        assert!(normalize(&SourceCollections::new()).is_empty());
    }
}
