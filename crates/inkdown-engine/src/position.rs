//! Cursor position mapping between the surface and the document.
//!
//! A [`CursorPosition`] is structural: line index plus a character offset
//! into that line's logical (unstyled) content. A [`SurfacePoint`] is a
//! location in the rendered line's visible text, decorations included.
//! Both directions are folds over the line's typed segments; decoration
//! runs never count toward the logical offset.
//!
//! Restoration is forgiving by contract: offsets past the end of content
//! clamp to end-of-content, and a vanished line makes the whole operation a
//! no-op rather than an error - both happen routinely on delete edits.

use serde::{Deserialize, Serialize};

use crate::surface::{Segment, Surface};

/// Structural cursor coordinate. `offset` counts characters of the line's
/// raw text, never markup, and is clamped to the line length on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: usize,
    pub offset: usize,
}

/// A caret location in the rendered surface: line index plus an offset into
/// the line's visible text (decorations included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePoint {
    pub line: usize,
    pub text_offset: usize,
}

/// Convert a surface location to a structural cursor position.
pub fn to_position(surface: &Surface, at: SurfacePoint) -> CursorPosition {
    let Some(line) = surface.line(at.line) else {
        return CursorPosition { line: 0, offset: 0 };
    };
    let mut remaining = at.text_offset;
    let mut offset = 0;
    for segment in &line.segments {
        let len = segment.char_len();
        let take = remaining.min(len);
        if matches!(segment, Segment::Content(_)) {
            offset += take;
        }
        remaining -= take;
        if remaining == 0 {
            break;
        }
    }
    CursorPosition {
        line: at.line,
        offset,
    }
}

/// Convert a structural cursor position back to a surface location.
///
/// Returns `None` when the line no longer exists (the document shrank);
/// an offset past the end of content clamps to end-of-content.
pub fn from_position(surface: &Surface, pos: CursorPosition) -> Option<SurfacePoint> {
    let line = surface.line(pos.line)?;
    let mut remaining = pos.offset;
    let mut acc = 0; // running visible-text offset
    let mut end_of_content = 0; // clamp target
    let mut seen_content = false;

    for segment in &line.segments {
        let len = segment.char_len();
        match segment {
            Segment::Decoration(_) => acc += len,
            Segment::Content(_) => {
                seen_content = true;
                if remaining < len {
                    return Some(SurfacePoint {
                        line: pos.line,
                        text_offset: acc + remaining,
                    });
                }
                remaining -= len;
                acc += len;
                end_of_content = acc;
                if remaining == 0 {
                    return Some(SurfacePoint {
                        line: pos.line,
                        text_offset: acc,
                    });
                }
            }
        }
    }

    // Offset exceeded the content; clamp. A line with no content at all
    // (blank placeholder) parks the caret after its decorations.
    Some(SurfacePoint {
        line: pos.line,
        text_offset: if seen_content { end_of_content } else { acc },
    })
}
