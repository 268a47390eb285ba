//! Markup-to-raw-text extraction.
//!
//! The reverse half of the styling round trip: walk the surface's content
//! segments, drop every decoration (gutters, anchors, reserved code
//! points), decode entities, and join lines back into the raw document.
//! `extract(render(d)) == d.to_text()` modulo trailing-whitespace
//! normalization.

use crate::surface::Surface;

/// Recover raw document text from rendered (or user-edited) markup.
pub fn extract(markup: &str) -> String {
    let surface = Surface::parse(markup);
    extract_surface(&surface)
}

/// Same, for an already-parsed surface.
pub fn extract_surface(surface: &Surface) -> String {
    let lines: Vec<String> = surface.lines.iter().map(|l| l.content_text()).collect();
    lines.join("\n")
}
