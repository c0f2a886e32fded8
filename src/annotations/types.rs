//! Highlight types for the annotation engine
//!
//! A `Highlight` anchors to its reading by literal text quote rather than by
//! positional selector: the selected substring is captured verbatim at
//! creation and re-located in the field text on every render. That keeps the
//! persisted shape small and survives reformatting of the surrounding
//! content; a quote that no longer matches is simply not shown.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted user annotation: a literal text span plus an optional note.
///
/// `text` and `color` are fixed at creation; only `note` is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Unique identifier (UUID v4), assigned at creation
    pub id: String,
    /// The exact substring selected at creation time
    pub text: String,
    /// Free-text note attached to the highlight
    #[serde(default)]
    pub note: String,
    /// Presentation tag for the mark
    #[serde(default)]
    pub color: HighlightColor,
    /// RFC 3339 creation timestamp. Informational only: insertion order,
    /// not timestamps, orders rendering.
    #[serde(default)]
    pub created_at: String,
}

/// Closed set of presentation tags for highlight marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    #[default]
    Yellow,
    Green,
    Blue,
    Pink,
}

impl HighlightColor {
    /// Stable lowercase tag, used in data attributes and CSS class names
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Blue => "blue",
            HighlightColor::Pink => "pink",
        }
    }
}

impl Highlight {
    /// Create a new highlight for an already-validated selection
    pub fn new(text: impl Into<String>, color: HighlightColor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            note: String::new(),
            color,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Check the invariants of a loaded highlight set: ids unique within the
/// set, every text non-empty. A set violating either is treated as corrupt.
pub fn set_is_well_formed(highlights: &[Highlight]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(highlights.len());
    highlights
        .iter()
        .all(|h| !h.text.is_empty() && !h.id.is_empty() && seen.insert(h.id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_highlight_defaults() {
        let h = Highlight::new("rise through trade", HighlightColor::default());
        assert!(!h.id.is_empty());
        assert_eq!(h.text, "rise through trade");
        assert_eq!(h.note, "");
        assert_eq!(h.color, HighlightColor::Yellow);
        assert!(!h.created_at.is_empty());
    }

    #[test]
    fn test_ids_unique_across_rapid_creation() {
        let ids: std::collections::HashSet<String> = (0..1000)
            .map(|_| Highlight::new("x", HighlightColor::Yellow).id)
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serialization_shape() {
        let h = Highlight::new("quoted span", HighlightColor::Green);
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["text"], "quoted span");
        assert_eq!(json["color"], "green");
        assert_eq!(json["note"], "");

        let parsed: Highlight = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn test_missing_note_and_color_default() {
        let parsed: Highlight =
            serde_json::from_str(r#"{"id":"h1","text":"span"}"#).unwrap();
        assert_eq!(parsed.note, "");
        assert_eq!(parsed.color, HighlightColor::Yellow);
    }

    #[test]
    fn test_well_formed_set() {
        let a = Highlight::new("a", HighlightColor::Yellow);
        let b = Highlight::new("b", HighlightColor::Blue);
        assert!(set_is_well_formed(&[a.clone(), b]));

        let dup = vec![a.clone(), a.clone()];
        assert!(!set_is_well_formed(&dup));

        let empty_text = vec![Highlight {
            text: String::new(),
            ..a
        }];
        assert!(!set_is_well_formed(&empty_text));
    }
}
