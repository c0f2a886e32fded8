//! Field rendering: highlight sets applied to prose text
//!
//! Two stages, both pure. `segment` resolves where each highlight lands in
//! the original text and emits a typed segment sequence; `html` turns that
//! sequence into escaped markup with `<mark>` elements. Claims are derived
//! fresh on every render and never persisted, so each field resolves its
//! highlights independently.

pub mod html;
pub mod segment;

pub use html::to_html;
pub use segment::{segments, Segment};

use crate::annotations::types::Highlight;
use serde::Serialize;

/// One rendered field: its segment sequence plus the escaped HTML form
#[derive(Debug, Clone, Serialize)]
pub struct RenderedField {
    pub path: String,
    pub text: String,
    pub segments: Vec<Segment>,
    pub html: String,
}

/// Render a single field against a highlight set.
pub fn render_field(path: &str, text: &str, highlights: &[Highlight]) -> RenderedField {
    let segments = segments(text, highlights);
    let html = to_html(&segments, highlights);
    RenderedField {
        path: path.to_string(),
        text: text.to_string(),
        segments,
        html,
    }
}
