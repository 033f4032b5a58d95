//! Shared text helpers for the render pipeline.

use regex::Regex;
use std::sync::LazyLock;

static ACRONYM_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

static WORD_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

static NON_ALNUM_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split a CamelCase page name into words: `ProjectWidgets` becomes
/// `Project Widgets`, `HTMLPage` becomes `HTML Page`.
pub fn titleize(name: &str) -> String {
    let spaced = ACRONYM_BOUNDARY_RE.replace_all(name, "$1 $2");
    WORD_BOUNDARY_RE.replace_all(&spaced, "$1 $2").into_owned()
}

/// Section id for a run of heading text.
///
/// Lower-cases, collapses each run of non-alphanumerics into one hyphen and
/// drops a trailing hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = NON_ALNUM_RUN_RE.replace_all(&lowered, "-");
    hyphenated
        .strip_suffix('-')
        .unwrap_or(&hyphenated)
        .to_string()
}
