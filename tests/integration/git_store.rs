//! Page storage in a git repository.

use std::process::Command;

use gitwiki::git::GitStore;
use gitwiki::{Error, PageStore};

use crate::fixtures::TestWiki;

fn git_log(wiki: &TestWiki) -> Vec<String> {
    let output = Command::new("git")
        .args(["log", "--format=%s"])
        .current_dir(&wiki.path)
        .output()
        .expect("Failed to run git log");
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_edits_are_commits() {
    let mut wiki = TestWiki::new();
    wiki.store.save("Journal", "day one").unwrap();
    wiki.store.save("Journal", "day two").unwrap();
    wiki.store.save("Journal", "day two").unwrap();
    wiki.store.remove("Journal").unwrap();

    assert_eq!(
        git_log(&wiki),
        vec!["Removed Journal", "Edited Journal", "Created Journal", "Created Home"]
    );
}

#[test]
fn test_reopen_sees_committed_pages() {
    let wiki = TestWiki::new().with_pages(&[("Recipes", "TODO bake bread")]);
    let reopened = GitStore::open(&wiki.path, ".markdown").unwrap();
    assert_eq!(reopened.find("Recipes").unwrap().as_deref(), Some("TODO bake bread"));

    let names: Vec<String> = reopened.list_all().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Home", "Recipes"]);
}

#[test]
fn test_other_extension_is_a_different_wiki() {
    let wiki = TestWiki::new();
    let md = GitStore::open(&wiki.path, ".md").unwrap();
    assert!(md.list_all().unwrap().is_empty());
    assert_eq!(md.find("Home").unwrap(), None);
}

#[test]
fn test_missing_top_level_page_propagates() {
    let wiki = TestWiki::new();
    let fetcher = gitwiki::fetch::StaticFetcher::default();
    let renderer = gitwiki::Renderer::new(&wiki.config, &wiki.store, &fetcher);
    assert!(matches!(renderer.render_named("Nope"), Err(Error::PageNotFound(name)) if name == "Nope"));
}
