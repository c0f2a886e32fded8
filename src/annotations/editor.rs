//! Note editor state machine
//!
//! The popup that edits a highlight's note, modeled as a pure state machine:
//! transitions return `EditorCommand`s describing the persistence side
//! effect they imply, and the session applies those commands to the store.
//! That keeps the commit association of every transition explicit and
//! testable without a database.
//!
//! Drafts are committed, never dropped, on loss of focus or when another
//! editor opens over this one; only explicit cancel discards a draft. The
//! delete affordance is two-step: the first request arms a confirmation
//! flag that lapses after a fixed window, checked against an injected
//! clock.

use chrono::{DateTime, Duration, Utc};

use super::selection::Anchor;

/// How long an armed delete request stays live before reverting
pub const DELETE_CONFIRM_WINDOW_SECS: i64 = 3;

/// The note editor: closed, or open on exactly one highlight
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NoteEditor {
    #[default]
    Closed,
    Open(OpenEditor),
}

/// Editor state while open on a highlight
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEditor {
    pub highlight_id: String,
    pub anchor: Anchor,
    pub draft: String,
    /// Set while a delete request is armed and awaiting confirmation
    delete_armed_until: Option<DateTime<Utc>>,
}

/// Persistence side effect implied by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    UpdateNote { highlight_id: String, note: String },
    DeleteHighlight { highlight_id: String },
}

/// Outcome of a delete request on an open editor
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteRequest {
    /// First request (or a lapsed one): armed, awaiting confirmation
    Armed,
    /// Second request within the window: the editor closed, apply this
    Confirmed(EditorCommand),
    /// Editor was not open; nothing to delete
    Ignored,
}

impl NoteEditor {
    pub fn is_open(&self) -> bool {
        matches!(self, NoteEditor::Open(_))
    }

    pub fn open_on(&self) -> Option<&OpenEditor> {
        match self {
            NoteEditor::Open(open) => Some(open),
            NoteEditor::Closed => None,
        }
    }

    /// Open the editor on a highlight.
    ///
    /// If another highlight's editor is already open, its draft is committed
    /// first; the returned command carries that commit. Re-opening the same
    /// highlight keeps the current draft and just moves the anchor.
    pub fn open(
        &mut self,
        highlight_id: &str,
        anchor: Anchor,
        current_note: &str,
    ) -> Option<EditorCommand> {
        let command = match self {
            NoteEditor::Open(open) if open.highlight_id == highlight_id => {
                open.anchor = anchor;
                return None;
            }
            NoteEditor::Open(open) => Some(EditorCommand::UpdateNote {
                highlight_id: open.highlight_id.clone(),
                note: open.draft.clone(),
            }),
            NoteEditor::Closed => None,
        };

        *self = NoteEditor::Open(OpenEditor {
            highlight_id: highlight_id.to_string(),
            anchor,
            draft: current_note.to_string(),
            delete_armed_until: None,
        });

        command
    }

    /// Replace the draft text. Local state only; nothing persists until a
    /// closing transition. Ignored while closed.
    pub fn edit(&mut self, draft: &str) {
        if let NoteEditor::Open(open) = self {
            open.draft = draft.to_string();
            // Typing disarms a pending delete
            open.delete_armed_until = None;
        }
    }

    /// Explicit save: close and commit the draft.
    pub fn save(&mut self) -> Option<EditorCommand> {
        self.close_committing()
    }

    /// Focus lost outside the editor: behaves exactly like save. Drafts are
    /// never silently discarded on blur.
    pub fn blur(&mut self) -> Option<EditorCommand> {
        self.close_committing()
    }

    /// Explicit cancel: close without committing, leaving the persisted
    /// note in force.
    pub fn cancel(&mut self) {
        *self = NoteEditor::Closed;
    }

    /// Request deletion of the open highlight.
    ///
    /// Two-step: the first call arms the confirmation flag, a second call
    /// within the window confirms and closes the editor. A call after the
    /// window lapses re-arms instead of deleting.
    pub fn request_delete(&mut self, now: DateTime<Utc>) -> DeleteRequest {
        let NoteEditor::Open(open) = self else {
            return DeleteRequest::Ignored;
        };

        match open.delete_armed_until {
            Some(armed_until) if now <= armed_until => {
                let command = EditorCommand::DeleteHighlight {
                    highlight_id: open.highlight_id.clone(),
                };
                *self = NoteEditor::Closed;
                DeleteRequest::Confirmed(command)
            }
            _ => {
                open.delete_armed_until =
                    Some(now + Duration::seconds(DELETE_CONFIRM_WINDOW_SECS));
                DeleteRequest::Armed
            }
        }
    }

    /// Whether a delete request is currently armed, as of `now`.
    pub fn delete_armed(&self, now: DateTime<Utc>) -> bool {
        match self {
            NoteEditor::Open(open) => open
                .delete_armed_until
                .is_some_and(|until| now <= until),
            NoteEditor::Closed => false,
        }
    }

    fn close_committing(&mut self) -> Option<EditorCommand> {
        match std::mem::take(self) {
            NoteEditor::Open(open) => Some(EditorCommand::UpdateNote {
                highlight_id: open.highlight_id,
                note: open.draft,
            }),
            NoteEditor::Closed => None,
        }
    }
}
