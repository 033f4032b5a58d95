//! End-to-end rendering tests.

use crate::fixtures::{render_in_memory, TestWiki};

/// Given two task lines and no list syntax
/// When the page renders
/// Then there are two task blocks, the second struck through, and no list
#[test]
fn test_task_lines_render_as_blocks() {
    let html = render_in_memory(&[], "Chores", "TODO buy milk\nDONE ship it\n");

    let first = html.find("<div class=\"task todo\">").expect("todo block");
    let second = html.find("<div class=\"task done\">").expect("done block");
    assert!(first < second);
    assert!(html[second..].starts_with("<div class=\"task done\"><del>"));
    assert!(!html.contains("<ul>"));
}

#[test]
fn test_existing_title_is_not_duplicated() {
    let html = render_in_memory(&[], "Notes", "# Title\nhello");
    assert_eq!(html.matches("<h1").count(), 1);
    assert!(!html.contains("Notes"));
}

#[test]
fn test_full_page_structure() {
    let content = "\
Preface text

# Groceries

TODO project:Home buy eggs

## Dairy

* DONE milk

### Cheese

cheddar

## Bakery

INCLUDE_HEAD http://bakery.example/menu
";
    let html = render_in_memory(&[], "Shopping", content);

    assert!(html.starts_with("<p>Preface text</p>\n<div class=\"section1\"><h1 id=\"groceries\">Groceries</h1>"));
    assert!(html.contains("<div class=\"section2\"><h2 id=\"dairy\">Dairy</h2>"));
    assert!(html.contains("<div class=\"section2\"><h2 id=\"bakery\">Bakery</h2>"));
    assert!(html.contains("<h3>Cheese</h3>"));
    assert!(html.contains("<div class=\"task done\"><del><strong>DONE</strong> milk</del></div>"));
    assert!(html.contains("<iframe src=\"http://bakery.example/menu\"></iframe>"));
    assert_eq!(html.matches("<div class=\"section").count(), 3);
    assert!(html.ends_with("</div></div>"));
}

#[test]
fn test_stored_page_renders_with_includes() {
    let wiki = TestWiki::new().with_pages(&[
        ("ProjectGarden", "TODO plant beans\nCANCEL buy gnome\n"),
        ("Home", "# Home\n\nINCLUDE project:Garden\n"),
    ]);

    let html = wiki.render("Home");
    assert!(html.contains("INCLUDE project:Garden <span class=\"count\">(2)</span>"));
    assert!(html.contains("<a class=\"edit\" href=\"/e/ProjectGarden\">edit</a>"));
    assert!(html.contains("<del><strong>CANCEL</strong>"));
}
