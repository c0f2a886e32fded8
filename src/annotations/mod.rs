//! The annotation engine
//!
//! Everything that turns a user's text selection into a persisted,
//! re-renderable highlight: the highlight model and store, selection
//! capture, the note editor state machine, and the per-reading session
//! that wires them together. Rendering lives in `crate::render` and is
//! fed from a session's current set.

pub mod editor;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;

pub use editor::{EditorCommand, NoteEditor};
pub use selection::{Anchor, CaptureOutcome, SelectionEvent};
pub use session::{AnnotationSession, SessionUpdate};
pub use store::{CreateHighlight, HighlightStore, UpdateNote};
pub use types::{Highlight, HighlightColor};
