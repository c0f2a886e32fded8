//! Selection capture: turning a reported selection event into an action
//!
//! The UI shell reports what happened at pointer release (what text was
//! selected, where, whether it was inside the content root, and whether the
//! target was an existing mark); this module decides what that means. A
//! click on an existing mark always routes to editing that highlight, even
//! when the click also carried a selection.

use serde::{Deserialize, Serialize};

/// Screen position a popup is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// What the UI observed at pointer release inside a reading view
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionEvent {
    /// The selected text, exactly as the UI reports it
    pub text: String,
    /// Screen position to anchor the note editor at
    pub anchor: Anchor,
    /// Whether the release happened inside the bounded content root
    pub inside_content_root: bool,
    /// Set when the event target was an existing highlighted segment
    pub target_highlight_id: Option<String>,
}

/// The decision made for one selection event
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// A fresh selection worth persisting as a highlight
    Create { text: String, anchor: Anchor },
    /// Click on an existing mark: route to editing its note
    EditExisting { highlight_id: String, anchor: Anchor },
    /// Nothing to do for this event
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OutsideContentRoot,
    EmptySelection,
}

/// Classify a selection event.
///
/// The selected text is passed through verbatim on acceptance; trimming is
/// only used to decide emptiness, never to alter what gets stored.
pub fn capture(event: SelectionEvent) -> CaptureOutcome {
    if !event.inside_content_root {
        return CaptureOutcome::Rejected(RejectReason::OutsideContentRoot);
    }

    if let Some(highlight_id) = event.target_highlight_id {
        return CaptureOutcome::EditExisting {
            highlight_id,
            anchor: event.anchor,
        };
    }

    if event.text.trim().is_empty() {
        return CaptureOutcome::Rejected(RejectReason::EmptySelection);
    }

    CaptureOutcome::Create {
        text: event.text,
        anchor: event.anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> SelectionEvent {
        SelectionEvent {
            text: text.to_string(),
            anchor: Anchor { x: 120.0, y: 48.0 },
            inside_content_root: true,
            target_highlight_id: None,
        }
    }

    #[test]
    fn test_fresh_selection_creates() {
        let outcome = capture(event("rise through trade"));
        assert_eq!(
            outcome,
            CaptureOutcome::Create {
                text: "rise through trade".to_string(),
                anchor: Anchor { x: 120.0, y: 48.0 },
            }
        );
    }

    #[test]
    fn test_selection_text_not_trimmed_on_accept() {
        let outcome = capture(event("  padded  "));
        assert!(matches!(
            outcome,
            CaptureOutcome::Create { text, .. } if text == "  padded  "
        ));
    }

    #[test]
    fn test_outside_content_root_rejected() {
        let mut e = event("valid text");
        e.inside_content_root = false;
        assert_eq!(
            capture(e),
            CaptureOutcome::Rejected(RejectReason::OutsideContentRoot)
        );
    }

    #[test]
    fn test_whitespace_selection_rejected() {
        assert_eq!(
            capture(event("   \n\t")),
            CaptureOutcome::Rejected(RejectReason::EmptySelection)
        );
    }

    #[test]
    fn test_click_on_existing_mark_routes_to_edit() {
        let mut e = event("");
        e.target_highlight_id = Some("h1".to_string());
        assert_eq!(
            capture(e),
            CaptureOutcome::EditExisting {
                highlight_id: "h1".to_string(),
                anchor: Anchor { x: 120.0, y: 48.0 },
            }
        );
    }

    #[test]
    fn test_mark_click_wins_over_carried_selection() {
        let mut e = event("some dragged text");
        e.target_highlight_id = Some("h1".to_string());
        assert!(matches!(capture(e), CaptureOutcome::EditExisting { .. }));
    }

    #[test]
    fn test_mark_click_outside_root_still_rejected() {
        let mut e = event("");
        e.inside_content_root = false;
        e.target_highlight_id = Some("h1".to_string());
        assert_eq!(
            capture(e),
            CaptureOutcome::Rejected(RejectReason::OutsideContentRoot)
        );
    }
}
