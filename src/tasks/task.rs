//! Task directives embedded in wiki pages.
//!
//! A directive is a single line such as `* TODO project:Widgets ship it`:
//! an optional bullet, a keyword, zero or more `key:value` tags and a free
//! text description.

use regex::Regex;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use super::include::Origin;
use crate::util::escape_html;

/// Keyword alternatives are ordered so `DONE` is tried before `DO`.
static TASK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\*\s+)?(DONE|DO|TODO|CANCEL|INCLUDE):?\s+((?:[^\s:]+:[^\s:/]\S*\s+)*)(.*)$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Do,
    Todo,
    Done,
    Cancel,
    Include,
}

impl TaskKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            TaskKind::Do => "DO",
            TaskKind::Todo => "TODO",
            TaskKind::Done => "DONE",
            TaskKind::Cancel => "CANCEL",
            TaskKind::Include => "INCLUDE",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "DO" => Some(TaskKind::Do),
            "TODO" => Some(TaskKind::Todo),
            "DONE" => Some(TaskKind::Done),
            "CANCEL" => Some(TaskKind::Cancel),
            "INCLUDE" => Some(TaskKind::Include),
            _ => None,
        }
    }

    /// CSS class used on the rendered task block.
    fn css_class(&self) -> &'static str {
        match self {
            TaskKind::Do => "do",
            TaskKind::Todo => "todo",
            TaskKind::Done => "done",
            TaskKind::Cancel => "cancel",
            TaskKind::Include => "include",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One parsed directive line.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub kind: TaskKind,
    /// Tags in source order. Duplicates are kept; lookup takes the first.
    pub attributes: Vec<(String, String)>,
    pub description: String,
    /// Source the task was aggregated from. `None` for tasks parsed directly
    /// from the page being rendered.
    pub origin: Option<Rc<Origin>>,
}

impl Task {
    /// Parse a single line (without its trailing newline).
    ///
    /// Returns `None` when the line does not start with a task keyword.
    pub fn parse(line: &str) -> Option<Task> {
        // The trailing space lets a bare `INCLUDE wiki:all` close its last tag.
        let padded = format!("{} ", line);
        let caps = TASK_LINE_RE.captures(&padded)?;
        let kind = TaskKind::from_keyword(caps.get(1)?.as_str())?;

        let attributes = caps
            .get(2)
            .map(|tags| {
                tags.as_str()
                    .split_whitespace()
                    .filter_map(|tag| tag.split_once(':'))
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let description = caps
            .get(3)
            .map(|d| d.as_str().trim().to_string())
            .unwrap_or_default();

        Some(Task {
            kind,
            attributes,
            description,
            origin: None,
        })
    }

    /// Value of the first attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_done(&self) -> bool {
        matches!(self.kind, TaskKind::Done | TaskKind::Cancel)
    }

    pub fn is_include(&self) -> bool {
        self.kind == TaskKind::Include
    }

    /// Append every inherited attribute whose key the task does not set itself.
    pub fn inherit(&mut self, inherited: &[(String, String)]) {
        for (key, value) in inherited {
            if self.get(key).is_none() {
                self.attributes.push((key.clone(), value.clone()));
            }
        }
    }

    /// Link back to where the task can be edited, if it was aggregated.
    pub fn origin_link(&self) -> Option<&str> {
        self.origin.as_deref().map(Origin::link)
    }

    /// Render as a task block: bold keyword, tags, description, struck
    /// through when done, followed by an edit link for aggregated tasks.
    pub fn to_html(&self) -> String {
        let mut body = format!("<strong>{}</strong>", self.kind.keyword());
        for (key, value) in &self.attributes {
            body.push_str(&format!(
                " <span class=\"tag\">{}:{}</span>",
                escape_html(key),
                escape_html(value)
            ));
        }
        if !self.description.is_empty() {
            body.push(' ');
            body.push_str(&escape_html(&self.description));
        }
        if self.is_done() {
            body = format!("<del>{}</del>", body);
        }
        if let Some(link) = self.origin_link() {
            body.push_str(&format!(
                " <a class=\"edit\" href=\"{}\">edit</a>",
                escape_html(link)
            ));
        }
        format!(
            "<div class=\"task {}\">{}</div>",
            self.kind.css_class(),
            body
        )
    }
}

impl fmt::Display for Task {
    /// The task in its source-line form, e.g. `TODO project:Foo buy milk`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (key, value) in &self.attributes {
            write!(f, " {}:{}", key, value)?;
        }
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}
