//! Free-text notes attached to a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub email: String,
}

/// A user-authored note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Note identifier (unique among notes)
    pub id: String,

    /// Optional headline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text
    pub content: String,

    pub creator: Creator,

    /// When the note was created
    pub created: DateTime<Utc>,

    /// Page the note is pinned to, if any (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Note {
    /// Create an unpinned note
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        creator_email: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: content.into(),
            creator: Creator {
                email: creator_email.into(),
            },
            created,
            page: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pin the note to a page
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_wire_shape() {
        let json = r#"{
            "id": "1",
            "title": "Test Note 1",
            "content": "Body",
            "creator": {"email": "a@example.com"},
            "created": "2024-01-01T00:00:00Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, "1");
        assert_eq!(note.title.as_deref(), Some("Test Note 1"));
        assert_eq!(note.creator.email, "a@example.com");
        assert!(note.page.is_none());
    }
}
