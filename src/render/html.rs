//! Escaped HTML emission over a segment sequence
//!
//! Every piece of text crossing into markup is escaped here, whether it
//! came from the Analysis Service or from a user selection: neither source
//! is trusted to be markup-safe. Highlighted segments become `<mark>`
//! elements carrying the highlight id and color tag as data attributes;
//! the embedding UI styles and click-targets them, it never re-matches
//! text itself.

use std::collections::HashMap;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::annotations::types::{Highlight, HighlightColor};

use super::segment::Segment;

/// Render a segment sequence as escaped HTML.
///
/// `highlights` supplies the color tag per id; a segment referencing an id
/// not in the set (cannot happen through the session, but the function is
/// total) falls back to the default color.
pub fn to_html(segments: &[Segment], highlights: &[Highlight]) -> String {
    let colors: HashMap<&str, HighlightColor> = highlights
        .iter()
        .map(|h| (h.id.as_str(), h.color))
        .collect();

    let mut out = String::with_capacity(
        segments.iter().map(|s| s.text.len()).sum::<usize>() + segments.len() * 16,
    );

    for segment in segments {
        match segment.highlight_id.as_deref() {
            Some(id) => {
                let color = colors.get(id).copied().unwrap_or_default();
                out.push_str("<mark class=\"mg-highlight mg-highlight-");
                out.push_str(color.as_str());
                out.push_str("\" data-highlight-id=\"");
                out.push_str(&encode_double_quoted_attribute(id));
                out.push_str("\" data-color=\"");
                out.push_str(color.as_str());
                out.push_str("\">");
                out.push_str(&encode_text(&segment.text));
                out.push_str("</mark>");
            }
            None => out.push_str(&encode_text(&segment.text)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::segments;

    fn highlight(text: &str, color: HighlightColor) -> Highlight {
        Highlight::new(text, color)
    }

    #[test]
    fn test_plain_text_passes_through_escaped() {
        let text = "Silver & silk < spices.";
        let html = to_html(&segments(text, &[]), &[]);
        assert_eq!(html, "Silver &amp; silk &lt; spices.");
    }

    #[test]
    fn test_mark_carries_id_and_color() {
        let h = highlight("trade", HighlightColor::Green);
        let text = "Empires rise through trade.";
        let html = to_html(&segments(text, &[h.clone()]), &[h.clone()]);

        assert!(html.contains(&format!("data-highlight-id=\"{}\"", h.id)));
        assert!(html.contains("data-color=\"green\""));
        assert!(html.contains("mg-highlight-green"));
        assert!(html.starts_with("Empires rise through <mark"));
        assert!(html.ends_with("</mark>."));
    }

    #[test]
    fn test_field_markup_is_neutralized() {
        let text = "Beware <script>alert('x')</script> of injected fields.";
        let html = to_html(&segments(text, &[]), &[]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_highlight_text_cannot_break_out_of_mark() {
        // A selection whose text is itself markup must render inert
        let h = highlight("<b>bold</b>", HighlightColor::Yellow);
        let text = "Some <b>bold</b> claims.";
        let html = to_html(&segments(text, &[h.clone()]), &[h]);

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("<mark"));
    }

    #[test]
    fn test_unknown_id_falls_back_to_default_color() {
        let seg = vec![Segment {
            text: "orphan".to_string(),
            highlight_id: Some("gone".to_string()),
        }];
        let html = to_html(&seg, &[]);
        assert!(html.contains("data-color=\"yellow\""));
    }

    #[test]
    fn test_empty_segments_yield_empty_html() {
        assert_eq!(to_html(&[], &[]), "");
    }
}
