//! Span and token annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label applied to an annotation or relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name (what label filters match against)
    pub text: String,

    /// Display color, e.g. "#ff0000"
    #[serde(default)]
    pub color: String,
}

impl Label {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// How the annotation anchors into the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Token-level annotation on a PDF page
    Token,

    /// Character-span annotation on a text document
    #[default]
    Span,
}

/// A labelled region of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,

    /// Source page (1-based); absent for unpaged text documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    pub label: Label,

    /// System-generated (parser/layout) rather than user-authored
    #[serde(default)]
    pub structural: bool,

    /// Text covered by the annotation
    #[serde(alias = "text", default)]
    pub raw_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub annotation_type: AnnotationKind,
}

impl Annotation {
    /// Create a non-structural span annotation
    pub fn new(id: impl Into<String>, label: Label, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page: None,
            label,
            structural: false,
            raw_text: raw_text.into(),
            created: None,
            annotation_type: AnnotationKind::Span,
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

    pub fn with_kind(mut self, kind: AnnotationKind) -> Self {
        self.annotation_type = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_accepts_text_alias() {
        let json = r##"{
            "id": "a1",
            "page": 2,
            "label": {"text": "Important", "color": "#f00"},
            "structural": true,
            "text": "the quoted span",
            "annotationType": "token"
        }"##;

        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.raw_text, "the quoted span");
        assert_eq!(annotation.page, Some(2));
        assert!(annotation.structural);
        assert_eq!(annotation.annotation_type, AnnotationKind::Token);
    }

    #[test]
    fn test_annotation_defaults() {
        let json = r#"{"id": "a2", "label": {"text": "Note"}, "rawText": "x"}"#;

        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert!(!annotation.structural);
        assert!(annotation.page.is_none());
        assert_eq!(annotation.annotation_type, AnnotationKind::Span);
        assert_eq!(annotation.label.color, "");
    }
}
