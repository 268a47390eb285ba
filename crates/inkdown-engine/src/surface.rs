//! Content model of the rendered surface.
//!
//! The live surface contains decorative markup - line-number gutters,
//! syntax-highlight wrappers, zero-width cursor anchors - that must never
//! count toward logical character offsets or leak into extracted text. This
//! module reduces the rendered markup to typed per-line segments (plain
//! content runs vs decoration runs) so that both extraction and cursor
//! offset math become simple folds, independent of any presentation tree.

use crate::escape::decode_html;

/// One run of visible text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Logical document text; counts toward cursor offsets.
    Content(String),
    /// Presentation-only text (gutter numbers, anchors); skipped entirely.
    Decoration(String),
}

impl Segment {
    pub fn char_len(&self) -> usize {
        match self {
            Segment::Content(t) | Segment::Decoration(t) => t.chars().count(),
        }
    }
}

/// The segment sequence of one rendered line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceLine {
    pub segments: Vec<Segment>,
}

impl SurfaceLine {
    /// Logical character count of this line.
    pub fn content_len(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Content(_)))
            .map(Segment::char_len)
            .sum()
    }

    /// Logical text of this line (the raw markdown line).
    pub fn content_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Content(t) => Some(t.as_str()),
                Segment::Decoration(_) => None,
            })
            .collect()
    }
}

/// Parsed view of a rendered document surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    pub lines: Vec<SurfaceLine>,
}

/// Characters that exist only to prop up the presentation: zero-width
/// cursor anchors and the engine's reserved private-use placeholders. They
/// are decoration wherever they appear.
fn is_anchor_char(c: char) -> bool {
    c == '\u{200B}' || c == '\u{FEFF}' || ('\u{E000}'..='\u{F8FF}').contains(&c)
}

impl Surface {
    /// Parse rendered markup into per-line segments.
    ///
    /// Lenient by design: every `<div>` starts a line, spans classed
    /// `md-gutter` mark decoration subtrees, text inside `md-content` is
    /// content. Anything outside a line (whitespace between blocks) is
    /// dropped.
    pub fn parse(markup: &str) -> Self {
        let mut lines: Vec<SurfaceLine> = Vec::new();
        let mut current: Option<SurfaceLine> = None;
        // Depth counters instead of a full tag stack: our markup only nests
        // spans inside the line div.
        let mut gutter_depth = 0usize;
        let mut content_depth = 0usize;
        let mut span_stack: Vec<(bool, bool)> = Vec::new();

        let mut rest = markup;
        while !rest.is_empty() {
            if let Some(stripped) = rest.strip_prefix('<') {
                let Some(end) = stripped.find('>') else {
                    break; // truncated tag; ignore the tail
                };
                let tag = &stripped[..end];
                rest = &stripped[end + 1..];

                if tag.starts_with("div") {
                    if let Some(done) = current.take() {
                        lines.push(done);
                    }
                    current = Some(SurfaceLine::default());
                    gutter_depth = 0;
                    content_depth = 0;
                    span_stack.clear();
                } else if tag.starts_with("/div") {
                    if let Some(done) = current.take() {
                        lines.push(done);
                    }
                } else if tag.starts_with("span") {
                    let gutter = has_class(tag, "md-gutter");
                    let content = has_class(tag, "md-content");
                    span_stack.push((gutter, content));
                    gutter_depth += usize::from(gutter);
                    content_depth += usize::from(content);
                } else if tag.starts_with("/span") {
                    if let Some((gutter, content)) = span_stack.pop() {
                        gutter_depth -= usize::from(gutter);
                        content_depth -= usize::from(content);
                    }
                }
                continue;
            }

            let text_end = rest.find('<').unwrap_or(rest.len());
            let raw_text = &rest[..text_end];
            rest = &rest[text_end..];

            let Some(line) = current.as_mut() else {
                continue;
            };
            if gutter_depth > 0 {
                push_segment(line, true, &decode_html(raw_text));
            } else if content_depth > 0 {
                // Anchor characters are decoration even inside content.
                for (is_decoration, run) in split_anchor_runs(&decode_html(raw_text)) {
                    push_segment(line, is_decoration, &run);
                }
            }
        }
        if let Some(done) = current.take() {
            lines.push(done);
        }
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&SurfaceLine> {
        self.lines.get(index)
    }
}

/// Exact-token class test on a raw tag string.
fn has_class(tag: &str, name: &str) -> bool {
    let Some(start) = tag.find("class=\"") else {
        return false;
    };
    let value = &tag[start + 7..];
    let Some(end) = value.find('"') else {
        return false;
    };
    value[..end].split_whitespace().any(|token| token == name)
}

/// Split decoded text into alternating (is_decoration, run) pieces.
fn split_anchor_runs(text: &str) -> Vec<(bool, String)> {
    let mut runs: Vec<(bool, String)> = Vec::new();
    for c in text.chars() {
        let decoration = is_anchor_char(c);
        match runs.last_mut() {
            Some((kind, run)) if *kind == decoration => run.push(c),
            _ => runs.push((decoration, c.to_string())),
        }
    }
    runs
}

/// Append text to the line, coalescing with a same-typed trailing segment.
fn push_segment(line: &mut SurfaceLine, decoration: bool, text: &str) {
    if text.is_empty() {
        return;
    }
    match (line.segments.last_mut(), decoration) {
        (Some(Segment::Decoration(run)), true) => run.push_str(text),
        (Some(Segment::Content(run)), false) => run.push_str(text),
        (_, true) => line.segments.push(Segment::Decoration(text.to_string())),
        (_, false) => line.segments.push(Segment::Content(text.to_string())),
    }
}
