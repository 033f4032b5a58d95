//! INCLUDE resolution.
//!
//! An `INCLUDE` task names a source of further tasks: every page
//! (`wiki:all`), a remote URL, or one page chosen by its `wiki`, `context` or
//! `project` tag. Resolution folds the source's task lines into a
//! [`TaskList`], tagging each with inherited attributes and its origin.
//! When a visited set is supplied, nested includes are expanded in place and
//! the set stops cycles; without one they stay as literal entries.

use std::rc::Rc;

use thiserror::Error;

use super::task::Task;
use crate::config::WikiConfig;
use crate::fetch::UrlFetcher;
use crate::store::PageStore;
use crate::util::escape_html;
use crate::{wlog_debug, wlog_trace, wlog_warn};

/// Attributes an INCLUDE hands down to every task it pulls in.
const INHERITED_KEYS: [&str; 2] = ["project", "context"];

/// Where a batch of aggregated tasks came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Page name prefixed with `/`, or the URL for remote sources.
    pub name: String,
    pub view_url: String,
    /// Absent for remote URLs.
    pub edit_url: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl Origin {
    pub fn remote(url: &str) -> Self {
        Self {
            name: url.to_string(),
            view_url: url.to_string(),
            edit_url: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Edit link when there is one, otherwise the view link.
    pub fn link(&self) -> &str {
        self.edit_url.as_deref().unwrap_or(&self.view_url)
    }
}

/// Why an INCLUDE produced no tasks. Rendered inline, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncludeError {
    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("page store unavailable: {0}")]
    Store(String),
}

/// Tasks gathered for one INCLUDE.
#[derive(Debug, Clone)]
pub struct TaskList {
    pub example: Task,
    pub tasks: Vec<Task>,
    pub error: Option<IncludeError>,
}

impl TaskList {
    fn new(example: &Task) -> Self {
        Self {
            example: example.clone(),
            tasks: Vec::new(),
            error: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Render as one line of HTML so markdown treats it as a single block.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"tasklist\"><h3 class=\"tasklist-head\">{} <span class=\"count\">({})</span></h3>",
            escape_html(&self.example.to_string()),
            self.tasks.len()
        );
        if let Some(error) = &self.error {
            html.push_str(&format!(
                "<p class=\"include-error\">{}</p>",
                escape_html(&error.to_string())
            ));
        }
        for task in &self.tasks {
            html.push_str(&task.to_html());
        }
        html.push_str("</div>");
        html
    }
}

/// Resolves INCLUDE tasks against the wiki's pages and remote URLs.
pub struct Aggregator<'a> {
    config: &'a WikiConfig,
    pages: &'a dyn PageStore,
    fetcher: &'a dyn UrlFetcher,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a WikiConfig, pages: &'a dyn PageStore, fetcher: &'a dyn UrlFetcher) -> Self {
        Self {
            config,
            pages,
            fetcher,
        }
    }

    /// Resolve `example` into a task list.
    ///
    /// `visited` enables recursive expansion; every call in one expansion
    /// shares the same set of origin names.
    pub fn resolve(&self, example: &Task, mut visited: Option<&mut Vec<String>>) -> TaskList {
        let mut list = TaskList::new(example);
        let inherited = inherited_attributes(example);
        wlog_debug!(
            "Aggregator::resolve example={:?} recursive={}",
            example.to_string(),
            visited.is_some()
        );

        if example.get("wiki") == Some("all") {
            match self.pages.list_all() {
                Ok(pages) => {
                    for (name, content) in pages {
                        let origin = self
                            .config
                            .page_origin(&name)
                            .with_attributes(inherited.clone());
                        self.fold(&content, origin, visited.as_mut().map(|v| &mut **v), &mut list.tasks);
                    }
                }
                Err(e) => {
                    wlog_warn!("Listing pages for {:?} failed: {}", example.to_string(), e);
                    list.error = Some(IncludeError::Store(e.to_string()));
                }
            }
        } else if example.description.starts_with("http") {
            let url = example.description.as_str();
            match self.fetcher.fetch(url) {
                Ok(body) => {
                    let origin = Origin::remote(url).with_attributes(inherited);
                    self.fold(&body, origin, visited, &mut list.tasks);
                }
                Err(e) => {
                    wlog_warn!("Fetching {} failed: {}", url, e);
                    list.error = Some(IncludeError::FetchFailure {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        } else if let Some(target) = target_page(example) {
            match self.pages.find(&target) {
                Ok(Some(content)) => {
                    let origin = self.config.page_origin(&target).with_attributes(inherited);
                    self.fold(&content, origin, visited, &mut list.tasks);
                }
                Ok(None) => {
                    wlog_warn!("Include target page not found: {}", target);
                    list.error = Some(IncludeError::PageNotFound(target));
                }
                Err(e) => {
                    wlog_warn!("Reading include target {} failed: {}", target, e);
                    list.error = Some(IncludeError::Store(e.to_string()));
                }
            }
        } else {
            wlog_debug!("Include {:?} names no target", example.to_string());
        }

        wlog_debug!(
            "Aggregator::resolve example={:?} tasks={}",
            example.to_string(),
            list.tasks.len()
        );
        list
    }

    /// Parse `source` line by line, appending its tasks to `out`.
    fn fold(
        &self,
        source: &str,
        origin: Origin,
        mut visited: Option<&mut Vec<String>>,
        out: &mut Vec<Task>,
    ) {
        if let Some(seen) = visited.as_mut() {
            if seen.contains(&origin.name) {
                wlog_debug!("Include cycle at {}, skipping", origin.name);
                return;
            }
            seen.push(origin.name.clone());
        }

        let origin = Rc::new(origin);
        for line in source.lines() {
            let Some(mut task) = Task::parse(line) else {
                continue;
            };
            task.inherit(&origin.attributes);
            task.origin = Some(Rc::clone(&origin));
            wlog_trace!("fold {} -> {}", origin.name, task);

            match visited.as_mut() {
                Some(seen) if task.is_include() => {
                    let nested = self.resolve(&task, Some(&mut **seen));
                    if let Some(error) = &nested.error {
                        wlog_warn!("Nested include {} in {}: {}", task, origin.name, error);
                    }
                    out.extend(nested.tasks);
                }
                _ => out.push(task),
            }
        }
    }
}

fn inherited_attributes(example: &Task) -> Vec<(String, String)> {
    INHERITED_KEYS
        .iter()
        .filter_map(|key| example.get(key).map(|v| (key.to_string(), v.to_string())))
        .collect()
}

/// Page named by an include: `wiki`, then `Context<x>`, then `Project<x>`.
fn target_page(example: &Task) -> Option<String> {
    example
        .get("wiki")
        .map(str::to_string)
        .or_else(|| example.get("context").map(|c| format!("Context{}", c)))
        .or_else(|| example.get("project").map(|p| format!("Project{}", p)))
}
