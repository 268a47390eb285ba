//! HTML-entity escaping for text and attribute positions.
//!
//! Escaping happens exactly once per raw span, after backslash-escape
//! extraction and before any inline pass runs. Nothing in the engine ever
//! escapes already-escaped output; extraction decodes entities on the way
//! back out.

use std::borrow::Cow;

/// Escape `& < > " '` for a text position. Single pass, so entities the
/// escaper produces are never re-escaped.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Escape a value destined for a double-quoted attribute (`data-href`,
/// `data-src`).
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Decode HTML entities back to literal characters.
pub fn decode_html(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_angle_brackets_and_ampersand() {
        let out = escape_html("a < b & c > d");
        assert!(out.contains("&lt;"));
        assert!(out.contains("&gt;"));
        assert!(out.contains("&amp;"));
    }

    #[test]
    fn ampersand_is_not_double_escaped() {
        let out = escape_html("&lt;");
        // The source ampersand is escaped once; the rest stays literal text.
        assert_eq!(out.as_ref(), "&amp;lt;");
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_then_decode_round_trips() {
        let input = r#"<b class="x"> & 'quotes'"#;
        assert_eq!(decode_html(&escape_html(input)).as_ref(), input);
    }

    #[test]
    fn attribute_escaping_covers_quotes() {
        let out = escape_attribute(r#"url"with"quotes"#);
        assert!(!out.contains('"'));
    }
}
