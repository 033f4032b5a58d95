use std::fs;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Index, ObjectType, Oid, Repository, Signature, Tree, TreeWalkMode, TreeWalkResult};

use crate::store::{sort_pages, validate_page_name, PageStore};
use crate::{wlog, wlog_debug, Error, Result};

/// Pages stored as `<name><extension>` files in a git repository.
///
/// Reads come from the HEAD commit; every save or removal is its own commit.
pub struct GitStore {
    repo_path: PathBuf,
    extension: String,
}

impl GitStore {
    pub fn open(repo_path: &Path, extension: &str) -> Result<Self> {
        wlog_debug!("GitStore::open path={}", repo_path.display());
        let repo = Repository::discover(repo_path)?;
        let workdir = repo.workdir().ok_or_else(|| {
            Error::Validation(format!("{}: bare repositories are not supported", repo_path.display()))
        })?;
        Ok(Self {
            repo_path: workdir.to_path_buf(),
            extension: extension.to_string(),
        })
    }

    /// Create a new wiki repository whose first commit holds the homepage.
    pub fn init(repo_path: &Path, extension: &str, homepage: &str) -> Result<Self> {
        wlog_debug!("GitStore::init path={}", repo_path.display());
        fs::create_dir_all(repo_path)?;
        Repository::init(repo_path)?;
        let mut store = Self::open(repo_path, extension)?;
        if store.find(homepage)?.is_none() {
            store.save(homepage, &format!("# {}\n\nWelcome to your wiki.\n", homepage))?;
        }
        Ok(store)
    }

    fn repo(&self) -> Result<Repository> {
        Ok(Repository::open(&self.repo_path)?)
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn page_path(&self, name: &str) -> String {
        format!("{}{}", name, self.extension)
    }

    fn head_tree(repo: &Repository) -> Result<Option<Tree<'_>>> {
        match repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn commit_index(repo: &Repository, index: &mut Index, message: &str) -> Result<Oid> {
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let sig = repo
            .signature()
            .or_else(|_| Signature::now("gitwiki", "gitwiki@localhost"))?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };

        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let commit_id = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        wlog!("Committed {}: {}", commit_id, message);
        Ok(commit_id)
    }

    pub fn head_commit(&self) -> Result<Option<String>> {
        let repo = self.repo()?;
        let id = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?.id().to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        Ok(id)
    }
}

impl PageStore for GitStore {
    fn find(&self, name: &str) -> Result<Option<String>> {
        validate_page_name(name)?;
        let repo = self.repo()?;
        let Some(tree) = Self::head_tree(&repo)? else {
            return Ok(None);
        };
        let path = self.page_path(name);
        let entry = match tree.get_path(Path::new(&path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }
        let blob = repo.find_blob(entry.id())?;
        Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
    }

    fn list_all(&self) -> Result<Vec<(String, String)>> {
        let repo = self.repo()?;
        let Some(tree) = Self::head_tree(&repo)? else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(String, Oid)> = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(stem) = entry.name().and_then(|n| n.strip_suffix(&self.extension)) {
                    entries.push((format!("{}{}", root, stem), entry.id()));
                }
            }
            TreeWalkResult::Ok
        })?;

        let mut pages = Vec::with_capacity(entries.len());
        for (name, oid) in entries {
            let blob = repo.find_blob(oid)?;
            pages.push((name, String::from_utf8_lossy(blob.content()).into_owned()));
        }
        sort_pages(&mut pages);
        wlog_debug!("GitStore::list_all found {} pages", pages.len());
        Ok(pages)
    }

    fn save(&mut self, name: &str, content: &str) -> Result<()> {
        let existing = self.find(name)?;
        if existing.as_deref() == Some(content) {
            wlog_debug!("GitStore::save {} unchanged, not committing", name);
            return Ok(());
        }

        let path = self.page_path(name);
        let file = self.repo_path.join(&path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content)?;

        let repo = self.repo()?;
        let mut index = repo.index()?;
        index.add_path(Path::new(&path))?;
        let message = match existing {
            Some(_) => format!("Edited {}", name),
            None => format!("Created {}", name),
        };
        Self::commit_index(&repo, &mut index, &message)?;
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        if self.find(name)?.is_none() {
            return Err(Error::PageNotFound(name.to_string()));
        }

        let path = self.page_path(name);
        let repo = self.repo()?;
        let mut index = repo.index()?;
        index.remove_path(Path::new(&path))?;

        let file = self.repo_path.join(&path);
        if file.exists() {
            fs::remove_file(&file)?;
        }
        Self::commit_index(&repo, &mut index, &format!("Removed {}", name))?;
        Ok(())
    }
}
