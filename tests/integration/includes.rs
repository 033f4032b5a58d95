//! INCLUDE resolution through the public API.

use gitwiki::fetch::StaticFetcher;
use gitwiki::tasks::{Aggregator, IncludeError, Task};
use gitwiki::WikiConfig;

use crate::fixtures::{memory_store, render_in_memory, TestWiki};

fn include(line: &str) -> Task {
    Task::parse(line).expect("include line")
}

#[test]
fn test_mutual_includes_terminate() {
    let config = WikiConfig::default();
    let store = memory_store(&[
        ("A", "TODO task of a\nINCLUDE wiki:B\n"),
        ("B", "TODO task of b\nINCLUDE wiki:A\n"),
    ]);
    let fetcher = StaticFetcher::default();
    let aggregator = Aggregator::new(&config, &store, &fetcher);

    let mut visited = vec!["/A".to_string()];
    let list = aggregator.resolve(&include("INCLUDE wiki:B"), Some(&mut visited));
    let descriptions: Vec<&str> = list.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["task of b"]);
}

#[test]
fn test_recursive_render_of_cyclic_pages() {
    let pages = [
        ("A", "TODO task of a\nINCLUDE wiki:B\n"),
        ("B", "TODO task of b\nINCLUDE wiki:A\n"),
    ];
    let html = render_in_memory(&pages, "A", "TODO task of a\nINCLUDE wiki:B recursive:true\n");
    assert!(html.contains("<span class=\"count\">(1)</span>"));
    assert_eq!(html.matches("task of b").count(), 1);
    assert_eq!(html.matches("task of a").count(), 1);
}

#[test]
fn test_project_page_tags_its_tasks() {
    let config = WikiConfig::default();
    let store = memory_store(&[("ProjectWidgets", "TODO design\nDO context:lab prototype\n")]);
    let fetcher = StaticFetcher::default();
    let list = Aggregator::new(&config, &store, &fetcher).resolve(&include("INCLUDE project:Widgets"), None);

    assert_eq!(list.tasks.len(), 2);
    for task in &list.tasks {
        assert_eq!(task.get("project"), Some("Widgets"));
    }
    assert_eq!(list.tasks[1].get("context"), Some("lab"));
}

#[test]
fn test_context_inherited_through_nested_includes() {
    let config = WikiConfig::default();
    let store = memory_store(&[
        ("ContextOffice", "TODO file expenses\nINCLUDE wiki:ProjectLaunch project:Launch\n"),
        ("ProjectLaunch", "TODO write announcement\n"),
    ]);
    let fetcher = StaticFetcher::default();
    let mut visited = Vec::new();
    let list = Aggregator::new(&config, &store, &fetcher)
        .resolve(&include("INCLUDE context:Office"), Some(&mut visited));

    assert_eq!(list.tasks.len(), 2);
    let nested = &list.tasks[1];
    assert_eq!(nested.description, "write announcement");
    assert_eq!(nested.get("project"), Some("Launch"));
    assert_eq!(nested.get("context"), Some("Office"));
    assert_eq!(nested.origin_link(), Some("/e/ProjectLaunch"));
}

/// An inherited context outranks the nested include's own project when
/// choosing its target page, so the nested include points back at its
/// parent and the cycle guard drops it.
#[test]
fn test_inherited_context_retargets_nested_project_include() {
    let config = WikiConfig::default();
    let store = memory_store(&[
        ("ContextOffice", "TODO file expenses\nINCLUDE project:Launch\n"),
        ("ProjectLaunch", "TODO write announcement\n"),
    ]);
    let fetcher = StaticFetcher::default();
    let mut visited = Vec::new();
    let list = Aggregator::new(&config, &store, &fetcher)
        .resolve(&include("INCLUDE context:Office"), Some(&mut visited));

    let descriptions: Vec<&str> = list.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["file expenses"]);
    assert_eq!(visited, vec!["/ContextOffice"]);
}

#[test]
fn test_wiki_all_over_git_store() {
    let wiki = TestWiki::new().with_pages(&[
        ("zoo", "TODO feed animals"),
        ("Attic", "TODO sort boxes"),
        ("notes/Basement", "DONE fix leak"),
    ]);
    let fetcher = StaticFetcher::default();
    let list = Aggregator::new(&wiki.config, &wiki.store, &fetcher).resolve(&include("INCLUDE wiki:all"), None);

    let descriptions: Vec<&str> = list.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["sort boxes", "fix leak", "feed animals"]);
}

#[test]
fn test_remote_include_and_failure() {
    let fetcher = StaticFetcher::default().with_body("https://tasks.example/list", "TODO remote task\n");
    let wiki = TestWiki::new().with_pages(&[(
        "Remote",
        "INCLUDE https://tasks.example/list\nINCLUDE https://down.example/list\n",
    )]);

    let html = wiki.render_with("Remote", &fetcher);
    assert!(html.contains("remote task"));
    assert!(html.contains("href=\"https://tasks.example/list\""));
    assert!(html.contains("failed to fetch https://down.example/list"));
}

#[test]
fn test_missing_page_error_value() {
    let config = WikiConfig::default();
    let store = memory_store(&[]);
    let fetcher = StaticFetcher::default();
    let list = Aggregator::new(&config, &store, &fetcher).resolve(&include("INCLUDE project:Ghost"), None);
    assert!(list.tasks.is_empty());
    assert_eq!(list.error, Some(IncludeError::PageNotFound("ProjectGhost".to_string())));
}
