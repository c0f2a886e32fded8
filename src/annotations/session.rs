//! Per-reading annotation session
//!
//! The explicit context object for one open reading view: it loads the
//! highlight set, owns the single note editor, routes selection capture
//! outcomes, and applies editor commands to the store. Every mutation
//! awaits its persist before the in-memory set is updated and the call
//! returns, so memory and storage never diverge from the caller's
//! perspective. The renderer takes the session's current set; nothing is
//! read from ambient state.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::editor::{DeleteRequest, EditorCommand, NoteEditor};
use super::selection::{capture, Anchor, CaptureOutcome, SelectionEvent};
use super::store::{CreateHighlight, HighlightStore};
use super::types::Highlight;
use crate::error::Result;
use crate::render::{segments, Segment};

/// What one session step asks the UI to do
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionUpdate {
    /// Editor state after the step, for the popup to mirror
    pub editor: EditorSnapshot,
    /// The UI must clear its text selection so the next one starts clean
    pub clear_selection: bool,
    /// Highlight whose persisted state changed in this step, if any
    pub changed_highlight: Option<String>,
}

/// Immutable view of the editor for the UI layer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorSnapshot {
    #[default]
    Closed,
    Open {
        highlight_id: String,
        anchor: Anchor,
        draft: String,
    },
}

impl EditorSnapshot {
    fn of(editor: &NoteEditor) -> Self {
        match editor.open_on() {
            Some(open) => EditorSnapshot::Open {
                highlight_id: open.highlight_id.clone(),
                anchor: open.anchor,
                draft: open.draft.clone(),
            },
            None => EditorSnapshot::Closed,
        }
    }
}

/// Annotation context for one open reading view
pub struct AnnotationSession {
    pool: SqlitePool,
    reading_id: String,
    set: Vec<Highlight>,
    editor: NoteEditor,
}

impl AnnotationSession {
    /// Open a session, loading the persisted set (empty on absence or
    /// corruption) with a closed editor.
    pub async fn open(pool: SqlitePool, reading_id: &str) -> Result<Self> {
        let set = HighlightStore::new(&pool).load(reading_id).await?;
        Ok(Self {
            pool,
            reading_id: reading_id.to_string(),
            set,
            editor: NoteEditor::default(),
        })
    }

    /// The current in-memory highlight set, in insertion order.
    pub fn highlights(&self) -> &[Highlight] {
        &self.set
    }

    /// Derive the segment sequence for one field from the current set.
    pub fn segments(&self, field_text: &str) -> Vec<Segment> {
        segments(field_text, &self.set)
    }

    /// Handle a pointer-release selection event.
    ///
    /// A fresh selection creates and persists a highlight and opens the
    /// editor on it; a click on an existing mark opens the editor on that
    /// highlight pre-filled with its note. Either way a previously open
    /// draft is committed first, never dropped.
    pub async fn handle_selection(&mut self, event: SelectionEvent) -> Result<SessionUpdate> {
        match capture(event) {
            CaptureOutcome::Create { text, anchor } => {
                let store = HighlightStore::new(&self.pool);
                let highlight = store
                    .create(&self.reading_id, &CreateHighlight { text, color: None })
                    .await?;
                self.set.push(highlight.clone());

                let prior = self.editor.open(&highlight.id, anchor, "");
                self.apply(prior).await?;

                Ok(SessionUpdate {
                    editor: EditorSnapshot::of(&self.editor),
                    clear_selection: true,
                    changed_highlight: Some(highlight.id),
                })
            }
            CaptureOutcome::EditExisting {
                highlight_id,
                anchor,
            } => {
                let Some(current) = self.set.iter().find(|h| h.id == highlight_id) else {
                    // Stale mark in the UI; treat as a no-op
                    tracing::debug!(
                        reading_id = %self.reading_id,
                        highlight_id = %highlight_id,
                        "click on unknown mark ignored"
                    );
                    return Ok(SessionUpdate {
                        editor: EditorSnapshot::of(&self.editor),
                        clear_selection: true,
                        changed_highlight: None,
                    });
                };
                let note = current.note.clone();

                let prior = self.editor.open(&highlight_id, anchor, &note);
                let changed = self.apply(prior).await?;

                Ok(SessionUpdate {
                    editor: EditorSnapshot::of(&self.editor),
                    clear_selection: true,
                    changed_highlight: changed,
                })
            }
            CaptureOutcome::Rejected(reason) => {
                tracing::debug!(reading_id = %self.reading_id, ?reason, "selection rejected");
                Ok(SessionUpdate {
                    editor: EditorSnapshot::of(&self.editor),
                    clear_selection: false,
                    changed_highlight: None,
                })
            }
        }
    }

    /// Replace the open editor's draft. Local only; nothing persists.
    pub fn edit_draft(&mut self, draft: &str) -> SessionUpdate {
        self.editor.edit(draft);
        SessionUpdate {
            editor: EditorSnapshot::of(&self.editor),
            ..Default::default()
        }
    }

    /// Explicit save: close the editor and commit its draft.
    pub async fn save(&mut self) -> Result<SessionUpdate> {
        let command = self.editor.save();
        let changed = self.apply(command).await?;
        Ok(SessionUpdate {
            editor: EditorSnapshot::of(&self.editor),
            clear_selection: false,
            changed_highlight: changed,
        })
    }

    /// Focus lost outside the editor: commits exactly like save.
    pub async fn blur(&mut self) -> Result<SessionUpdate> {
        let command = self.editor.blur();
        let changed = self.apply(command).await?;
        Ok(SessionUpdate {
            editor: EditorSnapshot::of(&self.editor),
            clear_selection: false,
            changed_highlight: changed,
        })
    }

    /// Explicit cancel: close without committing; the persisted note stands.
    pub fn cancel(&mut self) -> SessionUpdate {
        self.editor.cancel();
        SessionUpdate::default()
    }

    /// Request deletion of the highlight the editor is open on. Two-step:
    /// arm, then confirm within the window.
    pub async fn request_delete(&mut self, now: DateTime<Utc>) -> Result<SessionUpdate> {
        match self.editor.request_delete(now) {
            DeleteRequest::Confirmed(command) => {
                let changed = self.apply(Some(command)).await?;
                Ok(SessionUpdate {
                    editor: EditorSnapshot::of(&self.editor),
                    clear_selection: false,
                    changed_highlight: changed,
                })
            }
            DeleteRequest::Armed | DeleteRequest::Ignored => Ok(SessionUpdate {
                editor: EditorSnapshot::of(&self.editor),
                ..Default::default()
            }),
        }
    }

    /// Whether the delete affordance is currently armed.
    pub fn delete_armed(&self, now: DateTime<Utc>) -> bool {
        self.editor.delete_armed(now)
    }

    /// Apply an editor command to the store and mirror it into the set.
    async fn apply(&mut self, command: Option<EditorCommand>) -> Result<Option<String>> {
        let Some(command) = command else {
            return Ok(None);
        };
        let store = HighlightStore::new(&self.pool);

        match command {
            EditorCommand::UpdateNote { highlight_id, note } => {
                let updated = store
                    .update_note(&self.reading_id, &highlight_id, &note)
                    .await?;
                if let Some(h) = self.set.iter_mut().find(|h| h.id == highlight_id) {
                    *h = updated;
                }
                Ok(Some(highlight_id))
            }
            EditorCommand::DeleteHighlight { highlight_id } => {
                store.delete(&self.reading_id, &highlight_id).await?;
                self.set.retain(|h| h.id != highlight_id);
                Ok(Some(highlight_id))
            }
        }
    }
}
