//! Page rendering pipeline.
//!
//! Stages run in a fixed order, each over the previous stage's output:
//! subtopic frames, task directives, markdown, heading injection, section
//! structuring and link injection.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::WikiConfig;
use crate::fetch::UrlFetcher;
use crate::sections::structure;
use crate::store::PageStore;
use crate::tasks::{Aggregator, Task};
use crate::util::{escape_html, titleize};
use crate::{wlog_debug, Error, Result};

static SUBTOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*INCLUDE_HEAD\s+(\S+)\s*$").unwrap());

/// A source line after substitution, and whether it was replaced by HTML.
struct Line {
    text: String,
    replaced: bool,
}

/// Join substituted lines. A raw HTML line swallows the lines after it into
/// the same markdown HTML block, so a blank line is put between a
/// replacement and following plain text.
fn join_lines(lines: Vec<Line>) -> String {
    let mut out = String::new();
    let mut after_replacement = false;
    for line in lines {
        if after_replacement && !line.replaced && !line.text.trim().is_empty() {
            out.push('\n');
        }
        out.push_str(&line.text);
        out.push('\n');
        after_replacement = line.replaced;
    }
    out
}

/// Replace `INCLUDE_HEAD <url>` lines with an embedded frame.
pub fn substitute_subtopics(text: &str) -> String {
    let lines = text
        .lines()
        .map(|line| match SUBTOPIC_RE.captures(line) {
            Some(caps) => Line {
                text: format!(
                    "<div class=\"subtopic\"><iframe src=\"{}\"></iframe></div>",
                    escape_html(&caps[1])
                ),
                replaced: true,
            },
            None => Line {
                text: line.to_string(),
                replaced: false,
            },
        })
        .collect();
    join_lines(lines)
}

/// Render markdown to HTML. Raw HTML blocks pass through unchanged.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Prepend a level-1 heading built from the page name when there is none.
pub fn inject_heading(html: &str, page_name: &str) -> String {
    if html.contains("<h1") {
        return html.to_string();
    }
    format!("<h1>{}</h1>\n{}", escape_html(&titleize(page_name)), html)
}

/// Hook for wiki-word auto-linking, which is disabled.
pub fn inject_links(html: String) -> String {
    html
}

/// Renders wiki pages, resolving INCLUDEs against the configured store.
pub struct Renderer<'a> {
    config: &'a WikiConfig,
    pages: &'a dyn PageStore,
    fetcher: &'a dyn UrlFetcher,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a WikiConfig, pages: &'a dyn PageStore, fetcher: &'a dyn UrlFetcher) -> Self {
        Self {
            config,
            pages,
            fetcher,
        }
    }

    /// Render a stored page. A missing page is an error here, unlike a
    /// missing include target.
    pub fn render_named(&self, name: &str) -> Result<String> {
        let content = self
            .pages
            .find(name)?
            .ok_or_else(|| Error::PageNotFound(name.to_string()))?;
        Ok(self.render_page(name, &content))
    }

    pub fn render_page(&self, name: &str, content: &str) -> String {
        wlog_debug!("Renderer::render_page name={} bytes={}", name, content.len());
        let text = substitute_subtopics(content);
        let text = self.substitute_tasks(&text, name);
        let html = render_markdown(&text);
        let html = inject_heading(&html, name);
        let html = structure(&html, 1);
        inject_links(html)
    }

    /// Swap every task line for its HTML. INCLUDE lines expand recursively
    /// only when tagged `recursive:true`.
    pub fn substitute_tasks(&self, text: &str, page_name: &str) -> String {
        let aggregator = Aggregator::new(self.config, self.pages, self.fetcher);
        let lines = text
            .lines()
            .map(|line| match Task::parse(line) {
                None => Line {
                    text: line.to_string(),
                    replaced: false,
                },
                Some(task) if task.is_include() => {
                    let list = if task.get("recursive") == Some("true") {
                        let mut visited = vec![format!("/{}", page_name)];
                        aggregator.resolve(&task, Some(&mut visited))
                    } else {
                        aggregator.resolve(&task, None)
                    };
                    Line {
                        text: list.to_html(),
                        replaced: true,
                    }
                }
                Some(task) => Line {
                    text: task.to_html(),
                    replaced: true,
                },
            })
            .collect();
        join_lines(lines)
    }
}
