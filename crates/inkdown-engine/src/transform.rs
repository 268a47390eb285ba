//! Structural line-type conversion and inline format toggling.
//!
//! Both operate directly on the raw line array and rely on the classifier's
//! shared pattern table: stripping a line's marker uses the identical
//! precedence order as classification, so strip is the exact inverse of
//! classify and the two can never disagree.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

use crate::classify::strip_marker;
use crate::document::Document;

/// Target types for line conversion. Everything converts 1:1 except
/// `Code`, which expands one line into a three-line fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    Paragraph,
    Heading(u8),
    Bullet,
    Ordered,
    Task,
    Quote,
    Code,
}

/// Inline formats the toggler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineFormat {
    Bold,
    Italic,
    Code,
    Strike,
    Link,
}

impl InlineFormat {
    fn marker(self) -> Option<&'static str> {
        match self {
            InlineFormat::Bold => Some("**"),
            InlineFormat::Italic => Some("*"),
            InlineFormat::Code => Some("`"),
            InlineFormat::Strike => Some("~~"),
            InlineFormat::Link => None,
        }
    }
}

/// Convert a line to a new type: strip its current leading marker, prepend
/// the canonical marker of the target type. Out-of-range lines are a no-op.
pub fn apply_line_type(doc: &mut Document, index: usize, line_type: LineType) {
    let Some(line) = doc.line(index) else {
        return;
    };
    let content = strip_marker(line).to_string();
    match line_type {
        LineType::Code => {
            // One line becomes three: opening fence, content, closing fence.
            doc.splice_line(index, vec!["```".to_string(), content, "```".to_string()]);
        }
        _ => {
            doc.set_line(index, format!("{}{}", canonical_marker(line_type), content));
        }
    }
}

fn canonical_marker(line_type: LineType) -> String {
    match line_type {
        LineType::Paragraph => String::new(),
        LineType::Heading(level) => {
            let level = level.clamp(1, 6) as usize;
            format!("{} ", "#".repeat(level))
        }
        LineType::Bullet => "- ".to_string(),
        LineType::Ordered => "1. ".to_string(),
        LineType::Task => "- [ ] ".to_string(),
        LineType::Quote => "> ".to_string(),
        LineType::Code => String::new(),
    }
}

fn re_full_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]*)\]\(([^)]*)\)$").unwrap())
}

/// Toggle an inline format across a selection on a single line, returning
/// the new selection (character offsets).
///
/// Bold/italic/code/strike strip when the markers immediately surround the
/// selection or when the selection bounds include them with marker-only
/// overhang; otherwise they wrap. Link is containment-only: it strips iff
/// the selected text itself is a full `[text](url)` span (discarding the
/// URL), and wrapping inserts an empty-target link. The asymmetry is
/// inherited behavior, kept as-is.
pub fn toggle_inline_format(
    doc: &mut Document,
    index: usize,
    selection: Range<usize>,
    format: InlineFormat,
) -> Range<usize> {
    let Some(line) = doc.line(index) else {
        return selection;
    };
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let start = selection.start.min(len);
    let end = selection.end.clamp(start, len);

    let (new_line, new_selection) = match format.marker() {
        Some(marker) => toggle_marker_format(&chars, start, end, marker),
        None => toggle_link(&chars, start, end),
    };
    doc.set_line(index, new_line);
    new_selection
}

fn slice(chars: &[char], range: Range<usize>) -> String {
    chars[range].iter().collect()
}

fn toggle_marker_format(
    chars: &[char],
    start: usize,
    end: usize,
    marker: &str,
) -> (String, Range<usize>) {
    let mlen = marker.chars().count();
    let len = chars.len();

    // Markers just outside the selection bounds.
    if start >= mlen
        && end + mlen <= len
        && slice(chars, start - mlen..start) == marker
        && slice(chars, end..end + mlen) == marker
    {
        let new_line: String = chars[..start - mlen]
            .iter()
            .chain(&chars[start..end])
            .chain(&chars[end + mlen..])
            .collect();
        return (new_line, start - mlen..end - mlen);
    }

    // Selection bounds include the markers with marker-only overhang.
    if end - start >= 2 * mlen
        && slice(chars, start..start + mlen) == marker
        && slice(chars, end - mlen..end) == marker
    {
        let new_line: String = chars[..start]
            .iter()
            .chain(&chars[start + mlen..end - mlen])
            .chain(&chars[end..])
            .collect();
        return (new_line, start..end - 2 * mlen);
    }

    // Neither: wrap.
    let selected = slice(chars, start..end);
    let new_line: String = chars[..start]
        .iter()
        .collect::<String>()
        + marker
        + &selected
        + marker
        + &chars[end..].iter().collect::<String>();
    (new_line, start + mlen..end + mlen)
}

fn toggle_link(chars: &[char], start: usize, end: usize) -> (String, Range<usize>) {
    let selected = slice(chars, start..end);

    // Containment only: the selected text itself must be a full link span.
    if let Some(caps) = re_full_link().captures(&selected) {
        let text = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let text_len = text.chars().count();
        let new_line: String =
            chars[..start].iter().collect::<String>() + &text + &chars[end..].iter().collect::<String>();
        return (new_line, start..start + text_len);
    }

    let new_line: String = chars[..start].iter().collect::<String>()
        + "["
        + &selected
        + "]()"
        + &chars[end..].iter().collect::<String>();
    (new_line, start + 1..end + 1)
}
