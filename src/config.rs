use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tasks::Origin;
use crate::{wlog_debug, Error, Result};

/// Wiki-wide settings, passed explicitly to the renderer and the include
/// resolver instead of being read from process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub repo: Option<String>,
    pub homepage: String,
    pub extension: String,
    pub fetch_timeout_secs: Option<u64>,
    pub url_prefix: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            repo: None,
            homepage: "Home".to_string(),
            extension: ".markdown".to_string(),
            fetch_timeout_secs: None,
            url_prefix: String::new(),
        }
    }
}

impl WikiConfig {
    pub fn wiki_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".gitwiki"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::wiki_dir()?.join("config.toml"))
    }

    /// Location of the backing git repository.
    ///
    /// Falls back to `$GIT_WIKI_REPO`, then `~/wiki`.
    pub fn repo_path(&self) -> Result<PathBuf> {
        if let Some(repo) = &self.repo {
            return Ok(expand_tilde(repo));
        }
        if let Ok(env_repo) = std::env::var("GIT_WIKI_REPO") {
            return Ok(expand_tilde(&env_repo));
        }
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join("wiki"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        wlog_debug!("WikiConfig::load path={}", path.display());
        if !path.exists() {
            wlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        wlog_debug!(
            "Config loaded: repo={:?}, homepage={}, extension={}",
            config.repo,
            config.homepage,
            config.extension
        );
        Ok(config)
    }

    /// Write this config to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                wlog_debug!("Creating config directory {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        wlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.homepage.trim().is_empty() {
            return Err(Error::Validation("homepage must not be empty".to_string()));
        }
        if !self.extension.starts_with('.') {
            return Err(Error::Validation(format!(
                "extension must start with '.', got {:?}",
                self.extension
            )));
        }
        Ok(())
    }

    pub fn view_url(&self, page: &str) -> String {
        format!("{}/{}", self.url_prefix, page)
    }

    pub fn edit_url(&self, page: &str) -> String {
        format!("{}/e/{}", self.url_prefix, page)
    }

    /// Origin of a wiki page; its name matches the seed used for the
    /// visited set when a page render starts a recursive include.
    pub fn page_origin(&self, page: &str) -> Origin {
        Origin {
            name: format!("/{}", page),
            view_url: self.view_url(page),
            edit_url: Some(self.edit_url(page)),
            attributes: Vec::new(),
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
