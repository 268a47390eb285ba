//! Inline span styling.
//!
//! Converts the inline markdown of one logical line (bold, italic, code,
//! links, images, strikethrough, math, footnote refs, escapes) into tagged
//! markup. This is a fixed chain of regex passes over a string, not a
//! parser: each pass must never re-match markup produced by an earlier one.
//!
//! Two placeholder mechanisms make that safe, both using code points from
//! the Unicode private use area (which never occur in real content and are
//! stripped from input defensively):
//!
//! - **Escape slots** (U+E100 upward): backslash-escaped punctuation is
//!   lifted out before HTML escaping so escaped markers are never read as
//!   syntax, and restored at the very end as a visibly marked escape span.
//! - **Shields** (U+E000 block): marker characters a pass has consumed
//!   (and literal markers inside URLs) are swapped for sentinels so later
//!   passes skip them, then swapped back before returning.
//!
//! Every styled span wraps the literal syntax characters in a
//! `<span class="md-syntax">` next to the semantic content, so the surface
//! shows `**bold**` with the asterisks de-emphasized rather than hidden.

pub(crate) mod rules;

use crate::escape::escape_html;

/// Reserved sentinels for marker characters consumed by a pass.
const SHIELDS: &[(char, char)] = &[
    ('*', '\u{E000}'),
    ('_', '\u{E001}'),
    ('`', '\u{E002}'),
    ('~', '\u{E003}'),
    ('$', '\u{E004}'),
    ('[', '\u{E005}'),
    (']', '\u{E006}'),
    ('(', '\u{E007}'),
    (')', '\u{E008}'),
];

/// First code point of the escape-slot range.
const ESCAPE_SLOT_BASE: u32 = 0xE100;
/// Last private-use code point; bounds the number of escapes per line.
const ESCAPE_SLOT_MAX: u32 = 0xF8FF;

/// Punctuation that a backslash escapes.
const ESCAPABLE: &[char] = &[
    '*', '_', '`', '[', ']', '(', ')', '#', '+', '-', '.', '!', '\\',
];

/// Style one line's inline content into markup.
pub fn style_inline(text: &str) -> String {
    let sanitized = strip_reserved(text);
    let (lifted, slots) = lift_escapes(&sanitized);
    let mut styled = escape_html(&lifted).into_owned();
    for pass in rules::passes() {
        styled = (pass.apply)(&styled);
    }
    let restored = restore_escapes(&styled, &slots);
    unshield(&restored)
}

/// Drop any private-use code points from raw input; they are reserved for
/// the placeholder machinery.
fn strip_reserved(text: &str) -> String {
    if text.chars().any(is_reserved) {
        text.chars().filter(|c| !is_reserved(*c)).collect()
    } else {
        text.to_string()
    }
}

fn is_reserved(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

/// Replace each `\X` escape with a slot sentinel, remembering the literal.
fn lift_escapes(text: &str) -> (String, Vec<char>) {
    let mut out = String::with_capacity(text.len());
    let mut slots = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && chars.peek().is_some_and(|next| ESCAPABLE.contains(next))
            && ESCAPE_SLOT_BASE + (slots.len() as u32) <= ESCAPE_SLOT_MAX
        {
            let literal = chars.next().expect("peeked");
            // Unwrap is safe: the range check above keeps us inside the PUA.
            let slot = char::from_u32(ESCAPE_SLOT_BASE + slots.len() as u32).expect("pua slot");
            slots.push(literal);
            out.push(slot);
        } else {
            out.push(c);
        }
    }
    (out, slots)
}

/// Render each escape slot back as a visibly marked escaped span.
fn restore_escapes(markup: &str, slots: &[char]) -> String {
    if slots.is_empty() {
        return markup.to_string();
    }
    let end = ESCAPE_SLOT_BASE + slots.len() as u32;
    let mut out = String::with_capacity(markup.len());
    for c in markup.chars() {
        let cp = c as u32;
        if (ESCAPE_SLOT_BASE..end).contains(&cp) {
            let literal = slots[(cp - ESCAPE_SLOT_BASE) as usize];
            out.push_str(r#"<span class="md-escape"><span class="md-syntax">\</span>"#);
            out.push(literal);
            out.push_str("</span>");
        } else {
            out.push(c);
        }
    }
    out
}

/// Swap marker characters for their sentinels so later passes skip them.
pub(crate) fn shield(text: &str) -> String {
    text.chars()
        .map(|c| {
            SHIELDS
                .iter()
                .find(|(plain, _)| *plain == c)
                .map_or(c, |(_, sentinel)| *sentinel)
        })
        .collect()
}

/// Restore shielded sentinels to their literal characters.
fn unshield(text: &str) -> String {
    text.chars()
        .map(|c| {
            SHIELDS
                .iter()
                .find(|(_, sentinel)| *sentinel == c)
                .map_or(c, |(plain, _)| *plain)
        })
        .collect()
}

/// Regex replacement with an explicit boundary guard.
///
/// The `regex` crate has no lookaround; guards inspect the characters
/// around a candidate match instead. Rejected matches are copied through
/// verbatim.
pub(crate) fn replace_matches(
    input: &str,
    re: &regex::Regex,
    guard: impl Fn(&str, &regex::Match<'_>) -> bool,
    render: impl Fn(&regex::Captures<'_>) -> String,
) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let whole = caps.get(0).expect("match group 0");
        out.push_str(&input[last..whole.start()]);
        if guard(input, &whole) {
            out.push_str(&render(&caps));
        } else {
            out.push_str(whole.as_str());
        }
        last = whole.end();
    }
    out.push_str(&input[last..]);
    out
}

pub(crate) fn char_before(s: &str, idx: usize) -> Option<char> {
    s[..idx].chars().next_back()
}

pub(crate) fn char_after(s: &str, idx: usize) -> Option<char> {
    s[idx..].chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn visible_text(markup: &str) -> String {
        // Strip tags and decode the entities the styler emits; mirrors what
        // extraction sees as a line's logical content.
        let mut out = String::new();
        let mut in_tag = false;
        for c in markup.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                c if !in_tag => out.push(c),
                _ => {}
            }
        }
        crate::escape::decode_html(&out).into_owned()
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(style_inline("just words"), "just words");
    }

    #[test]
    fn bold_wraps_syntax_and_content() {
        let markup = style_inline("a **bold** b");
        assert!(markup.contains(r#"<span class="md-bold">"#));
        assert!(markup.contains(r#"<span class="md-syntax">**</span>"#));
        assert_eq!(visible_text(&markup), "a **bold** b");
    }

    #[test]
    fn bold_italic_wins_over_bold_and_italic() {
        let markup = style_inline("***both***");
        assert!(markup.contains(r#"<span class="md-bold-italic">"#));
        assert!(!markup.contains(r#"<span class="md-bold">"#));
        assert!(!markup.contains(r#"<span class="md-italic">"#));
    }

    #[test]
    fn italic_does_not_match_inside_bold_markers() {
        let markup = style_inline("**bold**");
        assert!(markup.contains(r#"<span class="md-bold">"#));
        assert!(!markup.contains(r#"<span class="md-italic">"#));
    }

    #[test]
    fn snake_case_is_not_italicized() {
        let markup = style_inline("foo_bar_baz");
        assert!(!markup.contains("md-italic"));
        assert_eq!(markup, "foo_bar_baz");
    }

    #[test]
    fn underscore_italic_needs_non_alphanumeric_context() {
        let markup = style_inline("see _this_ here");
        assert!(markup.contains(r#"<span class="md-italic">"#));
    }

    #[test]
    fn underscore_bold_styles() {
        let markup = style_inline("__strong__");
        assert!(markup.contains(r#"<span class="md-bold">"#));
        assert_eq!(visible_text(&markup), "__strong__");
    }

    #[test]
    fn escaped_asterisks_never_become_italic() {
        let markup = style_inline(r"\*not italic\*");
        assert!(!markup.contains("md-italic"));
        assert!(markup.contains(r#"<span class="md-escape">"#));
        assert_eq!(visible_text(&markup), r"\*not italic\*");
    }

    #[test]
    fn escaped_backslash_is_preserved() {
        let markup = style_inline(r"a \\ b");
        assert_eq!(visible_text(&markup), r"a \\ b");
    }

    #[test]
    fn image_wins_over_link() {
        let markup = style_inline("![alt](img.png)");
        assert!(markup.contains(r#"<span class="md-image""#));
        assert!(!markup.contains(r#"<span class="md-link""#));
        assert_eq!(visible_text(&markup), "![alt](img.png)");
    }

    #[test]
    fn link_carries_href_attribute() {
        let markup = style_inline("[text](https://example.com)");
        assert!(markup.contains(r#"data-href="https://example.com""#));
        assert_eq!(visible_text(&markup), "[text](https://example.com)");
    }

    #[test]
    fn link_with_quoted_title_round_trips() {
        let markup = style_inline(r#"[text](page.md "A title")"#);
        assert!(markup.contains(r#"data-href="page.md""#));
        assert_eq!(visible_text(&markup), r#"[text](page.md "A title")"#);
    }

    #[test]
    fn markers_inside_link_urls_survive() {
        let input = "[a](path_with_underscores_x) and [b](star*path*y)";
        let markup = style_inline(input);
        assert_eq!(visible_text(&markup), input);
        // The underscores in the URL must not be italicized.
        assert!(!markup.contains("md-italic"));
    }

    #[test]
    fn footnote_reference_styles_before_link() {
        let markup = style_inline("claim[^1] text");
        assert!(markup.contains(r#"<span class="md-footnote-ref">"#));
        assert_eq!(visible_text(&markup), "claim[^1] text");
    }

    #[test]
    fn inline_code_and_math_and_strike() {
        let markup = style_inline("`code` $x+y$ ~~gone~~");
        assert!(markup.contains(r#"<span class="md-code">"#));
        assert!(markup.contains(r#"<span class="md-math">"#));
        assert!(markup.contains(r#"<span class="md-strike">"#));
        assert_eq!(visible_text(&markup), "`code` $x+y$ ~~gone~~");
    }

    #[test]
    fn html_is_escaped_exactly_once() {
        let markup = style_inline("a <b> & c");
        assert!(markup.contains("&lt;b&gt;"));
        assert!(markup.contains("&amp;"));
        assert_eq!(visible_text(&markup), "a <b> & c");
    }

    #[test]
    fn reserved_code_points_are_stripped_from_input() {
        let markup = style_inline("a\u{E000}b\u{E105}c");
        assert_eq!(markup, "abc");
    }

    #[test]
    fn no_private_use_chars_leak_into_output() {
        let samples = [
            "**b** *i* `c` ~~s~~ $m$",
            r"\* \_ \` \[ \]",
            "[t](u) ![a](i)",
            "***x*** __y__ _z_",
        ];
        for sample in samples {
            let markup = style_inline(sample);
            assert!(
                !markup.chars().any(is_reserved),
                "reserved char leaked for {sample:?}"
            );
        }
    }

    #[test]
    fn styling_is_deterministic() {
        let input = "# *a* **b** `c` [d](e)";
        assert_eq!(style_inline(input), style_inline(input));
    }
}
