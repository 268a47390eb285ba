//! The ordered line-pattern table.
//!
//! One table drives both classification and marker stripping so the two can
//! never drift apart: `classify` walks it to assign a [`LineKind`], and the
//! transformer walks the same table to strip a line's leading marker before
//! prepending a new one. Order is a policy, not an accident - first match
//! wins (task before bullet because its prefix is a superset, lists before
//! horizontal rule, and so on).

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::alert::AlertKind;
use super::LineKind;

/// How much of a matched line counts as its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerSpan {
    /// No marker; the whole line is content (table rows, paragraphs).
    None,
    /// Marker runs up to the start of the `rest` capture group.
    UpToRest,
    /// The entire line is marker syntax (rules, alert headers, fences).
    WholeLine,
}

pub(crate) struct LineRule {
    pub name: &'static str,
    pub regex: fn() -> &'static Regex,
    pub build: fn(&Captures) -> LineKind,
    pub marker: MarkerSpan,
}

fn re_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Exactly one space after the hashes; 7+ hashes fail to match at all and
    // fall through to paragraph.
    RE.get_or_init(|| Regex::new(r"^(#{1,6}) (?P<rest>.*)$").unwrap())
}

fn re_alert_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The line must contain only the marker.
    RE.get_or_init(|| {
        Regex::new(r"(?i)^>\s?\[!(?P<tag>note|tip|important|warning|caution)\]\s*$").unwrap()
    })
}

fn re_blockquote() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<marks>>+)\s?(?P<rest>.*)$").unwrap())
}

fn re_task_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+] \[(?P<check>[ xX])\] ?(?P<rest>.*)$").unwrap())
}

fn re_bullet_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+] (?P<rest>.*)$").unwrap())
}

fn re_ordered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\. (?P<rest>.*)$").unwrap())
}

fn re_horizontal_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Exclusively one character class per rule; mixed lines do not qualify.
    RE.get_or_init(|| Regex::new(r"^\s*(?:-{3,}|_{3,}|\*{3,})\s*$").unwrap())
}

fn re_table_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\|.*\|\s*$").unwrap())
}

fn re_separator_cell() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\s:-]+$").unwrap())
}

fn re_definition() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^: (?P<rest>.*)$").unwrap())
}

fn re_footnote_definition() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\^(?P<id>[^\]\s]+)\]: ?(?P<rest>.*)$").unwrap())
}

/// Depth cap applied for styling purposes; detection itself is unlimited.
pub const MAX_QUOTE_STYLE_DEPTH: u8 = 3;

/// A table-row line is a separator iff every pipe-delimited cell matches
/// `[\s:-]+`.
pub(crate) fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    let inner = &trimmed[1..trimmed.len() - 1];
    inner.split('|').all(|cell| re_separator_cell().is_match(cell))
}

pub(crate) fn line_rules() -> &'static [LineRule] {
    &[
        LineRule {
            name: "heading",
            regex: re_heading,
            build: |caps| LineKind::Heading {
                level: caps.get(1).map_or(1, |m| m.len() as u8),
            },
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "alert-header",
            regex: re_alert_header,
            build: |caps| LineKind::AlertHeader {
                // The alternation only admits valid tags.
                kind: AlertKind::parse(&caps["tag"]).unwrap_or(AlertKind::Note),
            },
            marker: MarkerSpan::WholeLine,
        },
        LineRule {
            name: "blockquote",
            regex: re_blockquote,
            build: |caps| LineKind::Blockquote {
                depth: caps["marks"].len().min(u8::MAX as usize) as u8,
            },
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "task-item",
            regex: re_task_item,
            build: |caps| LineKind::TaskItem {
                checked: &caps["check"] != " ",
            },
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "bullet-item",
            regex: re_bullet_item,
            build: |_| LineKind::BulletItem,
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "ordered-item",
            regex: re_ordered_item,
            build: |_| LineKind::OrderedItem,
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "horizontal-rule",
            regex: re_horizontal_rule,
            build: |_| LineKind::HorizontalRule,
            marker: MarkerSpan::WholeLine,
        },
        LineRule {
            name: "table-row",
            regex: re_table_row,
            build: |caps| {
                if is_separator_row(caps.get(0).map_or("", |m| m.as_str())) {
                    LineKind::TableSeparator
                } else {
                    LineKind::TableRow
                }
            },
            marker: MarkerSpan::None,
        },
        LineRule {
            name: "definition",
            regex: re_definition,
            build: |_| LineKind::Definition,
            marker: MarkerSpan::UpToRest,
        },
        LineRule {
            name: "footnote-definition",
            regex: re_footnote_definition,
            build: |_| LineKind::FootnoteDefinition,
            marker: MarkerSpan::UpToRest,
        },
    ]
}

/// Match a line against the table in precedence order.
///
/// Returns the kind plus the byte offset where the line's content begins
/// (the marker end).
pub(crate) fn match_line(line: &str) -> Option<(LineKind, usize)> {
    for rule in line_rules() {
        if let Some(caps) = (rule.regex)().captures(line) {
            let kind = (rule.build)(&caps);
            let marker_end = match rule.marker {
                MarkerSpan::None => 0,
                MarkerSpan::WholeLine => line.len(),
                MarkerSpan::UpToRest => caps.name("rest").map_or(line.len(), |m| m.start()),
            };
            return Some((kind, marker_end));
        }
    }
    None
}
