//! Wraps rendered HTML into nested, addressable sections.
//!
//! The document is split on every opening `<h1` tag; each piece from one
//! heading up to the next becomes `<div class="section1">` with an `id` on
//! its heading. The body after each level-1 heading is split the same way on
//! `<h2`. Deeper headings stay flat inside their level-2 section.

use regex::Regex;
use std::sync::LazyLock;

use crate::util::slugify;
use crate::wlog_trace;

/// Deepest heading level that gets its own section.
pub const MAX_SECTION_LEVEL: u8 = 2;

static LETTER_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}[^<]*").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ID_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)id\s*=\s*["']([^"']*)["']"#).unwrap());

/// Structure `html` starting at heading `level`.
pub fn structure(html: &str, level: u8) -> String {
    if level == 0 || level > MAX_SECTION_LEVEL {
        return html.to_string();
    }

    let open = format!("<h{}", level);
    let mut fragments = html.split(open.as_str());
    let mut out = fragments.next().unwrap_or_default().to_string();
    for fragment in fragments {
        out.push_str(&section(fragment, level));
    }
    out
}

/// Wrap one fragment, which starts just after its `<hN` tag prefix.
fn section(fragment: &str, level: u8) -> String {
    let Some(tag_end) = fragment.find('>') else {
        // Unterminated tag: nothing to hang a section on.
        return format!("<h{}{}", level, fragment);
    };
    let (attrs, rest) = fragment.split_at(tag_end);

    let close = format!("</h{}>", level);
    let (opening, slug) = match ID_ATTR_RE.captures(attrs) {
        Some(caps) => (format!("<h{}{}", level, attrs), caps[1].to_string()),
        None => {
            let slug = heading_slug(rest, &close);
            (format!("<h{} id=\"{}\"{}", level, slug, attrs), slug)
        }
    };
    wlog_trace!("section level={} id={}", level, slug);

    let body = match rest.find(&close) {
        Some(pos) if level < MAX_SECTION_LEVEL => {
            let (heading, tail) = rest.split_at(pos + close.len());
            format!("{}{}", heading, structure(tail, level + 1))
        }
        _ => rest.to_string(),
    };

    format!("<div class=\"section{}\">{}{}</div>", level, opening, body)
}

/// Slug from the first letter-initial run of the heading's text.
fn heading_slug(rest: &str, close: &str) -> String {
    let heading = rest.find(close).map_or(rest, |pos| &rest[..pos]);
    let text = TAG_RE.replace_all(heading, "");
    LETTER_RUN_RE
        .find(&text)
        .map(|m| slugify(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "section".to_string())
}
