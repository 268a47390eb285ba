//! Heading outline for the table-of-contents collaborator.
//!
//! The collaborator gets `{level, text}` pairs in document order and
//! reports back only which heading index was activated; ids are positional
//! (`heading-<n>`), so they are not stable across insertions or deletions
//! above a heading.

use serde::{Deserialize, Serialize};

use crate::classify::{LineKind, RenderState, classify};
use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Scan the document for headings, fence-aware: a `# line` inside a code
/// fence is code content, not a heading.
pub fn extract_headings(doc: &Document) -> Vec<Heading> {
    let mut state = RenderState::default();
    let mut headings = Vec::new();
    for line in doc.lines() {
        let classification = classify(line, &mut state);
        if let LineKind::Heading { level } = classification.kind {
            headings.push(Heading {
                level,
                text: line[classification.marker_end..].to_string(),
                id: format!("heading-{}", headings.len()),
            });
        }
    }
    headings
}

/// Resolve an activated heading (by outline index) back to its line.
pub fn heading_line(doc: &Document, heading_index: usize) -> Option<usize> {
    let mut state = RenderState::default();
    let mut seen = 0;
    for (line_index, line) in doc.lines().iter().enumerate() {
        if matches!(classify(line, &mut state).kind, LineKind::Heading { .. }) {
            if seen == heading_index {
                return Some(line_index);
            }
            seen += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_headings_in_document_order() {
        let doc = Document::from_text("# One\n\ntext\n\n## Two\n\n### Three");
        let headings = extract_headings(&doc);
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].text, "One");
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[2].text, "Three");
    }

    #[test]
    fn ids_are_positional() {
        let doc = Document::from_text("# A\n## B");
        let headings = extract_headings(&doc);
        assert_eq!(headings[0].id, "heading-0");
        assert_eq!(headings[1].id, "heading-1");
    }

    #[test]
    fn fenced_pseudo_headings_are_skipped() {
        let doc = Document::from_text("# Real\n```\n# Not real\n```\n## Also real");
        let headings = extract_headings(&doc);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Real");
        assert_eq!(headings[1].text, "Also real");
    }

    #[test]
    fn heading_line_resolves_by_outline_index() {
        let doc = Document::from_text("intro\n# One\ntext\n## Two");
        assert_eq!(heading_line(&doc, 0), Some(1));
        assert_eq!(heading_line(&doc, 1), Some(3));
        assert_eq!(heading_line(&doc, 2), None);
    }
}
