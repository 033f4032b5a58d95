//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Creating temporary wiki repositories
//! - Rendering pages against a store with an offline fetcher

use std::path::PathBuf;
use tempfile::TempDir;

use gitwiki::fetch::StaticFetcher;
use gitwiki::git::GitStore;
use gitwiki::store::MemoryStore;
use gitwiki::{PageStore, Renderer, WikiConfig};

/// A wiki backed by a temporary git repository.
pub struct TestWiki {
    /// Keeps the repository alive for the test's duration.
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub store: GitStore,
    pub config: WikiConfig,
}

impl TestWiki {
    /// Create a wiki whose only page is the default homepage.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("wiki");
        let config = WikiConfig {
            repo: Some(path.to_string_lossy().into_owned()),
            ..WikiConfig::default()
        };
        let store = GitStore::init(&path, &config.extension, &config.homepage)
            .expect("Failed to init wiki");
        Self {
            temp_dir,
            path,
            store,
            config,
        }
    }

    pub fn with_pages(mut self, pages: &[(&str, &str)]) -> Self {
        for (name, content) in pages {
            self.store.save(name, content).expect("Failed to save page");
        }
        self
    }

    pub fn render(&self, name: &str) -> String {
        self.render_with(name, &StaticFetcher::default())
    }

    pub fn render_with(&self, name: &str, fetcher: &StaticFetcher) -> String {
        Renderer::new(&self.config, &self.store, fetcher)
            .render_named(name)
            .expect("Failed to render page")
    }
}

/// Build an in-memory store from `(name, content)` pairs.
pub fn memory_store(pages: &[(&str, &str)]) -> MemoryStore {
    pages
        .iter()
        .fold(MemoryStore::new(), |store, (name, content)| store.with_page(name, content))
}

/// Render `content` as page `name` against an in-memory store.
pub fn render_in_memory(pages: &[(&str, &str)], name: &str, content: &str) -> String {
    let config = WikiConfig::default();
    let store = memory_store(pages);
    let fetcher = StaticFetcher::default();
    Renderer::new(&config, &store, &fetcher).render_page(name, content)
}
