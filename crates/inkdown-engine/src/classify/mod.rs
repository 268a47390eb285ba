//! Regex-driven line classification.
//!
//! Each line is assigned a [`LineKind`] from its own text plus a small
//! [`RenderState`] carried across lines (inside a code fence? continuing an
//! alert?). This is a total function: a line matching no specific pattern is
//! a paragraph by definition, never an error.
//!
//! Code fences are detected before everything else - while a fence is open,
//! every line is [`LineKind::CodeContent`] regardless of shape, which is why
//! `# comment` inside a fenced block never classifies as a heading.

mod alert;
pub(crate) mod rules;

pub use alert::AlertKind;
pub(crate) use rules::MAX_QUOTE_STYLE_DEPTH;

use regex::Regex;
use std::sync::OnceLock;

/// Semantic line type. Ephemeral: recomputed on every render, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading { level: u8 },
    AlertHeader { kind: AlertKind },
    AlertContinuation { kind: AlertKind },
    Blockquote { depth: u8 },
    TaskItem { checked: bool },
    BulletItem,
    OrderedItem,
    HorizontalRule,
    TableRow,
    TableSeparator,
    Definition,
    FootnoteDefinition,
    FenceOpen { lang: Option<String> },
    FenceClose,
    CodeContent,
    Blank,
    Paragraph,
}

/// Cross-line state threaded through a full-document classification pass.
/// Constructed fresh per render and discarded after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub inside_code_fence: bool,
    pub current_alert: Option<AlertKind>,
}

/// A classified line: its kind plus the byte offset where content begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: LineKind,
    pub marker_end: usize,
}

impl Classification {
    fn new(kind: LineKind, marker_end: usize) -> Self {
        Self { kind, marker_end }
    }
}

fn re_alert_continuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^>\s?").unwrap())
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

fn fence_lang(line: &str) -> Option<String> {
    let token = line[3..].trim().split_whitespace().next()?;
    let token = token.trim_matches('`');
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Classify one line, updating `state` for the lines that follow.
pub fn classify(line: &str, state: &mut RenderState) -> Classification {
    // Fences suppress all other classification.
    if state.inside_code_fence {
        if is_fence(line) {
            state.inside_code_fence = false;
            return Classification::new(LineKind::FenceClose, line.len());
        }
        return Classification::new(LineKind::CodeContent, 0);
    }
    if is_fence(line) {
        state.inside_code_fence = true;
        state.current_alert = None;
        return Classification::new(
            LineKind::FenceOpen {
                lang: fence_lang(line),
            },
            line.len(),
        );
    }

    let table_hit = rules::match_line(line);

    // A fresh alert header always wins, even while another alert continues.
    if let Some((LineKind::AlertHeader { kind }, marker_end)) = &table_hit {
        state.current_alert = Some(*kind);
        return Classification::new(LineKind::AlertHeader { kind: *kind }, *marker_end);
    }

    // Alert continuation: any `>`-prefixed line extends the current alert;
    // the first line that fails the pattern closes it.
    if let Some(tag) = state.current_alert {
        if let Some(m) = re_alert_continuation().find(line) {
            return Classification::new(LineKind::AlertContinuation { kind: tag }, m.end());
        }
        state.current_alert = None;
    }

    if line.trim().is_empty() {
        return Classification::new(LineKind::Blank, 0);
    }

    match table_hit {
        Some((kind, marker_end)) => Classification::new(kind, marker_end),
        None => Classification::new(LineKind::Paragraph, 0),
    }
}

/// Strip a line's leading marker using the same ordered table that drives
/// classification, so stripping is the exact inverse of classification.
///
/// Stateless on purpose: the transformer works on a single line at a time.
pub fn strip_marker(line: &str) -> &str {
    if is_fence(line) {
        return "";
    }
    match rules::match_line(line) {
        Some((_, marker_end)) => &line[marker_end..],
        None => line,
    }
}
