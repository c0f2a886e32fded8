//! Two-phase segmentation of a text field against a highlight set
//!
//! Phase one resolves claimed ranges: for each highlight in creation order,
//! the first occurrence of its text (scanning left to right) that does not
//! overlap an already-claimed range is claimed. Phase two walks the original
//! text once, emitting a plain segment for each gap and a highlighted
//! segment for each claim. Matching always runs against byte positions in
//! the original text, never against a partially-rendered buffer, so markup
//! inserted for one highlight can never be re-matched by another, and a
//! highlight whose text is a substring of an earlier one cannot nest
//! inside it.

use serde::Serialize;

use crate::annotations::types::Highlight;

/// A derived chunk of a rendered field, either plain or tagged with the
/// highlight that claimed it. Concatenating segment texts in order
/// reproduces the source field exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlight_id: Option<String>,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlight_id: None,
        }
    }

    fn highlighted(text: &str, id: &str) -> Self {
        Self {
            text: text.to_string(),
            highlight_id: Some(id.to_string()),
        }
    }
}

/// A resolved byte range of the source text assigned to one highlight
#[derive(Debug, Clone, PartialEq, Eq)]
struct Claim {
    start: usize,
    end: usize,
    highlight_id: String,
}

impl Claim {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Resolve non-overlapping claimed ranges over the original text.
///
/// Highlights are processed in creation order; each takes the leftmost
/// occurrence of its text that does not overlap a range already claimed by
/// an earlier highlight. A highlight whose text no longer occurs anywhere
/// (the field changed since creation) is skipped without error: annotations
/// are best-effort against evolving text. The returned claims are sorted by
/// start position.
fn resolve_claims(text: &str, highlights: &[Highlight]) -> Vec<Claim> {
    let mut claims: Vec<Claim> = Vec::new();

    for highlight in highlights {
        if highlight.text.is_empty() {
            continue;
        }

        let mut search_from = 0;
        while let Some(offset) = text[search_from..].find(&highlight.text) {
            let start = search_from + offset;
            let end = start + highlight.text.len();

            if claims.iter().any(|c| c.overlaps(start, end)) {
                // Occupied; keep scanning right for a free occurrence,
                // stepping a whole character to stay on a char boundary
                search_from = start
                    + text[start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                continue;
            }

            claims.push(Claim {
                start,
                end,
                highlight_id: highlight.id.clone(),
            });
            break;
        }
    }

    claims.sort_by_key(|c| c.start);
    claims
}

/// Segment a field against a highlight set.
///
/// Pure and deterministic: the same inputs always yield the same segment
/// sequence, and concatenating the segment texts reproduces `text` exactly.
pub fn segments(text: &str, highlights: &[Highlight]) -> Vec<Segment> {
    let claims = resolve_claims(text, highlights);

    let mut out = Vec::with_capacity(claims.len() * 2 + 1);
    let mut cursor = 0;

    for claim in &claims {
        if claim.start > cursor {
            out.push(Segment::plain(&text[cursor..claim.start]));
        }
        out.push(Segment::highlighted(
            &text[claim.start..claim.end],
            &claim.highlight_id,
        ));
        cursor = claim.end;
    }

    if cursor < text.len() {
        out.push(Segment::plain(&text[cursor..]));
    }

    // Whole field plain when nothing matched; an empty field yields no
    // segments at all
    out
}
