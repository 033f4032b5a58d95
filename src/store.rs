//! Page content storage.
//!
//! The render pipeline only reads pages; saving and removal are used by the
//! command line front end.

use std::collections::BTreeMap;

use crate::{Error, Result};

pub trait PageStore {
    /// Content of `name`, or `None` when no such page exists.
    fn find(&self, name: &str) -> Result<Option<String>>;

    /// Every page as `(name, content)`, ordered by case-insensitive name.
    fn list_all(&self) -> Result<Vec<(String, String)>>;

    fn save(&mut self, name: &str, content: &str) -> Result<()>;

    fn remove(&mut self, name: &str) -> Result<()>;
}

/// Sort pages the way listings and `wiki:all` includes present them.
pub fn sort_pages(pages: &mut [(String, String)]) {
    pages.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
}

/// Page names become file paths, so reject anything that could escape the
/// wiki or address a directory.
pub fn validate_page_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("page name must not be empty".to_string()));
    }
    if name.starts_with('/')
        || name.ends_with('/')
        || name.split('/').any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Err(Error::Validation(format!("invalid page name: {:?}", name)));
    }
    Ok(())
}

/// Pages held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pages: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, name: &str, content: &str) -> Self {
        self.pages.insert(name.to_string(), content.to_string());
        self
    }
}

impl PageStore for MemoryStore {
    fn find(&self, name: &str) -> Result<Option<String>> {
        Ok(self.pages.get(name).cloned())
    }

    fn list_all(&self) -> Result<Vec<(String, String)>> {
        let mut pages: Vec<(String, String)> = self
            .pages
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        sort_pages(&mut pages);
        Ok(pages)
    }

    fn save(&mut self, name: &str, content: &str) -> Result<()> {
        validate_page_name(name)?;
        self.pages.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.pages
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::PageNotFound(name.to_string()))
    }
}
