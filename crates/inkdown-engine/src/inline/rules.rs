//! The ordered inline pass table.
//!
//! Later patterns must not re-match markup produced by earlier ones, so the
//! order here is load-bearing: images before links (the image pattern is a
//! superset of link syntax), footnote refs before links, and the longer
//! emphasis marker runs before the shorter (`***` before `**` before `*`,
//! otherwise a triple run fragments into nested spans).

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::{char_after, char_before, replace_matches, shield};

pub(crate) struct InlinePass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub(crate) fn passes() -> &'static [InlinePass] {
    &[
        InlinePass {
            name: "image",
            apply: apply_images,
        },
        InlinePass {
            name: "footnote-ref",
            apply: apply_footnote_refs,
        },
        InlinePass {
            name: "link",
            apply: apply_links,
        },
        InlinePass {
            name: "star-bold-italic",
            apply: apply_star_bold_italic,
        },
        InlinePass {
            name: "star-bold",
            apply: apply_star_bold,
        },
        InlinePass {
            name: "star-italic",
            apply: apply_star_italic,
        },
        InlinePass {
            name: "underscore-bold-italic",
            apply: apply_underscore_bold_italic,
        },
        InlinePass {
            name: "underscore-bold",
            apply: apply_underscore_bold,
        },
        InlinePass {
            name: "underscore-italic",
            apply: apply_underscore_italic,
        },
        InlinePass {
            name: "code",
            apply: apply_code,
        },
        InlinePass {
            name: "math",
            apply: apply_math,
        },
        InlinePass {
            name: "strike",
            apply: apply_strike,
        },
    ]
}

fn syntax(text: &str) -> String {
    format!(r#"<span class="md-syntax">{}</span>"#, shield(text))
}

/// Wrap content in an emphasis-style span, markers shielded, content left
/// open for later passes.
fn emphasis_span(class: &str, marker: &str, content: &str) -> String {
    format!(
        r#"<span class="{class}">{m}{content}{m}</span>"#,
        m = syntax(marker)
    )
}

/// Split `url "title"` (post-escaping: `url &quot;title&quot;`) into the
/// bare url; the full text stays visible in the rendered span either way.
fn bare_url(inner: &str) -> &str {
    match inner.find(" &quot;") {
        Some(pos) => inner[..pos].trim_end(),
        None => inner.trim(),
    }
}

fn re_image() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap())
}

fn apply_images(input: &str) -> String {
    replace_matches(input, re_image(), |_, _| true, |caps| {
        let inner = &caps[2];
        format!(
            r#"<span class="md-image" data-src="{src}">{open}<span class="md-image-alt">{alt}</span>{mid}<span class="md-url">{inner}</span>{close}</span>"#,
            src = shield(bare_url(inner)),
            open = syntax("!["),
            alt = shield(&caps[1]),
            mid = syntax("]("),
            inner = shield(inner),
            close = syntax(")"),
        )
    })
}

fn re_footnote_ref() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\^([^\]\s]+)\]").unwrap())
}

fn apply_footnote_refs(input: &str) -> String {
    replace_matches(input, re_footnote_ref(), |_, _| true, |caps| {
        format!(
            r#"<span class="md-footnote-ref">{open}{id}{close}</span>"#,
            open = syntax("[^"),
            id = shield(&caps[1]),
            close = syntax("]"),
        )
    })
}

fn re_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap())
}

fn apply_links(input: &str) -> String {
    replace_matches(input, re_link(), |_, _| true, |caps| {
        let inner = &caps[2];
        // Link text stays unshielded so emphasis inside it still styles;
        // the URL is shielded so markers in it are never corrupted.
        format!(
            r#"<span class="md-link" data-href="{href}">{open}<span class="md-link-text">{text}</span>{mid}<span class="md-url">{inner}</span>{close}</span>"#,
            href = shield(bare_url(inner)),
            open = syntax("["),
            text = &caps[1],
            mid = syntax("]("),
            inner = shield(inner),
            close = syntax(")"),
        )
    })
}

fn re_star_bold_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*\*([^*]+)\*\*\*").unwrap())
}

fn apply_star_bold_italic(input: &str) -> String {
    replace_matches(input, re_star_bold_italic(), |_, _| true, |caps| {
        emphasis_span("md-bold-italic", "***", &caps[1])
    })
}

fn re_star_bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").unwrap())
}

fn apply_star_bold(input: &str) -> String {
    replace_matches(input, re_star_bold(), |_, _| true, |caps| {
        emphasis_span("md-bold", "**", &caps[1])
    })
}

fn re_star_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").unwrap())
}

fn apply_star_italic(input: &str) -> String {
    // Reject matches adjacent to another asterisk: those belong to a `**`
    // run that failed to pair.
    replace_matches(
        input,
        re_star_italic(),
        |s, m| char_before(s, m.start()) != Some('*') && char_after(s, m.end()) != Some('*'),
        |caps| emphasis_span("md-italic", "*", &caps[1]),
    )
}

/// Underscore emphasis requires non-alphanumeric context on both sides so
/// `foo_bar_baz` stays literal. The asterisk variants carry no such guard.
fn underscore_context_ok(s: &str, m: &regex::Match<'_>) -> bool {
    char_before(s, m.start()).is_none_or(|c| !c.is_alphanumeric())
        && char_after(s, m.end()).is_none_or(|c| !c.is_alphanumeric())
}

fn re_underscore_bold_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"___([^_]+)___").unwrap())
}

fn apply_underscore_bold_italic(input: &str) -> String {
    replace_matches(input, re_underscore_bold_italic(), underscore_context_ok, |caps| {
        emphasis_span("md-bold-italic", "___", &caps[1])
    })
}

fn re_underscore_bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"__(.+?)__").unwrap())
}

fn apply_underscore_bold(input: &str) -> String {
    replace_matches(input, re_underscore_bold(), underscore_context_ok, |caps| {
        emphasis_span("md-bold", "__", &caps[1])
    })
}

fn re_underscore_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([^_]+)_").unwrap())
}

fn apply_underscore_italic(input: &str) -> String {
    replace_matches(input, re_underscore_italic(), underscore_context_ok, |caps| {
        emphasis_span("md-italic", "_", &caps[1])
    })
}

fn re_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap())
}

fn apply_code(input: &str) -> String {
    replace_matches(input, re_code(), |_, _| true, |caps| {
        // Code content is shielded wholesale: nothing inside backticks may
        // be styled by the remaining passes.
        format!(
            r#"<span class="md-code">{tick}{content}{tick}</span>"#,
            tick = syntax("`"),
            content = shield(&caps[1]),
        )
    })
}

fn re_math() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$([^$]+)\$").unwrap())
}

fn apply_math(input: &str) -> String {
    replace_matches(input, re_math(), |_, _| true, |caps| {
        format!(
            r#"<span class="md-math">{d}{content}{d}</span>"#,
            d = syntax("$"),
            content = shield(&caps[1]),
        )
    })
}

fn re_strike() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"~~(.+?)~~").unwrap())
}

fn apply_strike(input: &str) -> String {
    replace_matches(input, re_strike(), |_, _| true, |caps| {
        emphasis_span("md-strike", "~~", &caps[1])
    })
}
