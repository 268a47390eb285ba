//! Full-document styling.
//!
//! Two passes: the first classifies every line (threading the cross-line
//! [`RenderState`] for fences and alert runs) and resolves group boundaries;
//! the second emits one markup block per line. Rendering is pure - the same
//! document always yields byte-identical markup.
//!
//! Every line becomes
//!
//! ```text
//! <div class="md-line ..." data-line="N">
//!   <span class="md-gutter">N+1</span><span class="md-content">...</span></div>
//! ```
//!
//! The gutter is decoration: extraction and cursor math skip it entirely.
//! Blank lines carry a zero-width anchor so they stay focusable.

use crate::classify::{Classification, LineKind, MAX_QUOTE_STYLE_DEPTH, RenderState, classify};
use crate::document::Document;
use crate::escape::escape_html;
use crate::inline::style_inline;

/// Zero-width space entity anchoring the cursor on otherwise empty lines.
/// Stripped back out during extraction.
const BLANK_ANCHOR: &str = "&#8203;";

/// Render the whole document to styled markup.
pub fn render(doc: &Document) -> String {
    let mut state = RenderState::default();
    let classified: Vec<Classification> = doc
        .lines()
        .iter()
        .map(|line| classify(line, &mut state))
        .collect();
    let flags = group_flags(&classified);

    tracing::trace!(lines = doc.line_count(), "rendering document");

    let mut out = String::new();
    for (index, (classification, (first, last))) in classified.iter().zip(flags).enumerate() {
        let raw = doc.line(index).unwrap_or("");
        emit_line(&mut out, index, raw, classification, first, last);
    }
    out
}

/// Convenience wrapper for hosts holding raw text.
pub fn render_text(text: &str) -> String {
    render(&Document::from_text(text))
}

/// Lines that group visually share a key; `is_first`/`is_last` flags mark
/// the group edges for corner-rounding CSS.
fn group_key(kind: &LineKind) -> Option<u8> {
    match kind {
        LineKind::Blockquote { .. } => Some(1),
        LineKind::AlertHeader { .. } | LineKind::AlertContinuation { .. } => Some(2),
        LineKind::FenceOpen { .. } | LineKind::FenceClose | LineKind::CodeContent => Some(3),
        _ => None,
    }
}

fn starts_group(kind: &LineKind) -> bool {
    matches!(
        kind,
        LineKind::AlertHeader { .. } | LineKind::FenceOpen { .. }
    )
}

fn group_flags(classified: &[Classification]) -> Vec<(bool, bool)> {
    (0..classified.len())
        .map(|i| {
            let Some(key) = group_key(&classified[i].kind) else {
                return (false, false);
            };
            let prev_key = i
                .checked_sub(1)
                .and_then(|p| group_key(&classified[p].kind));
            let next = classified.get(i + 1);
            let next_key = next.and_then(|c| group_key(&c.kind));
            let first = starts_group(&classified[i].kind) || prev_key != Some(key);
            let last = matches!(classified[i].kind, LineKind::FenceClose)
                || next_key != Some(key)
                || next.is_some_and(|c| starts_group(&c.kind));
            (first, last)
        })
        .collect()
}

fn kind_classes(kind: &LineKind) -> String {
    match kind {
        LineKind::Heading { level } => format!("md-heading md-h{level}"),
        LineKind::AlertHeader { kind } => {
            format!("md-alert md-alert-{} md-alert-header", kind.css_class())
        }
        LineKind::AlertContinuation { kind } => format!("md-alert md-alert-{}", kind.css_class()),
        LineKind::Blockquote { depth } => {
            format!("md-quote md-quote-{}", (*depth).min(MAX_QUOTE_STYLE_DEPTH))
        }
        LineKind::TaskItem { checked: true } => "md-task md-task-done".to_string(),
        LineKind::TaskItem { checked: false } => "md-task".to_string(),
        LineKind::BulletItem => "md-bullet".to_string(),
        LineKind::OrderedItem => "md-ordered".to_string(),
        LineKind::HorizontalRule => "md-hr".to_string(),
        LineKind::TableRow => "md-table-row".to_string(),
        LineKind::TableSeparator => "md-table-separator".to_string(),
        LineKind::Definition => "md-definition".to_string(),
        LineKind::FootnoteDefinition => "md-footnote-def".to_string(),
        LineKind::FenceOpen { .. } => "md-fence md-fence-open".to_string(),
        LineKind::FenceClose => "md-fence md-fence-close".to_string(),
        LineKind::CodeContent => "md-code-content".to_string(),
        LineKind::Blank => "md-blank".to_string(),
        LineKind::Paragraph => "md-paragraph".to_string(),
    }
}

fn syntax_span(text: &str) -> String {
    format!(r#"<span class="md-syntax">{}</span>"#, escape_html(text))
}

/// Marker prefix rendered as de-emphasized syntax, rest styled inline.
fn prefixed_content(raw: &str, marker_end: usize) -> String {
    format!(
        "{}{}",
        syntax_span(&raw[..marker_end]),
        style_inline(&raw[marker_end..])
    )
}

/// Table rows interleave pipe syntax with inline-styled cells; splitting on
/// the pipes and joining them back keeps extraction exact.
fn table_row_content(raw: &str) -> String {
    let mut out = String::new();
    for (i, cell) in raw.split('|').enumerate() {
        if i > 0 {
            out.push_str(&syntax_span("|"));
        }
        out.push_str(&style_inline(cell));
    }
    out
}

fn line_content(raw: &str, classification: &Classification) -> String {
    match &classification.kind {
        LineKind::Heading { .. }
        | LineKind::Blockquote { .. }
        | LineKind::AlertContinuation { .. }
        | LineKind::TaskItem { .. }
        | LineKind::BulletItem
        | LineKind::OrderedItem
        | LineKind::Definition
        | LineKind::FootnoteDefinition => prefixed_content(raw, classification.marker_end),
        LineKind::AlertHeader { .. }
        | LineKind::HorizontalRule
        | LineKind::TableSeparator
        | LineKind::FenceOpen { .. }
        | LineKind::FenceClose => syntax_span(raw),
        LineKind::CodeContent => escape_html(raw).into_owned(),
        LineKind::TableRow => table_row_content(raw),
        LineKind::Blank => BLANK_ANCHOR.to_string(),
        LineKind::Paragraph => style_inline(raw),
    }
}

fn emit_line(
    out: &mut String,
    index: usize,
    raw: &str,
    classification: &Classification,
    first: bool,
    last: bool,
) {
    let mut classes = format!("md-line {}", kind_classes(&classification.kind));
    if first {
        classes.push_str(" md-first");
    }
    if last {
        classes.push_str(" md-last");
    }
    out.push_str(&format!(
        "<div class=\"{classes}\" data-line=\"{index}\"><span class=\"md-gutter\">{number}</span><span class=\"md-content\">{content}</span></div>\n",
        number = index + 1,
        content = line_content(raw, classification),
    ));
}
