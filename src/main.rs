use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use gitwiki::fetch::{HttpFetcher, StaticFetcher, UrlFetcher};
use gitwiki::git::GitStore;
use gitwiki::util::titleize;
use gitwiki::{wlog, wlog_error, Error, PageStore, Renderer, Result, WikiConfig};

/// gitwiki - render a git-backed wiki with embedded task lists
#[derive(Parser, Debug)]
#[command(name = "gitwiki")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    GIT_WIKI_REPO   Wiki repository (default ~/wiki)\n    GITWIKI_DEBUG=1 Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.gitwiki/gitwiki.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Config file (default ~/.gitwiki/config.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Wiki repository, overriding the config file
    #[arg(short = 'r', long)]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a wiki repository with a homepage
    Init,

    /// Render a page to HTML on stdout
    Render {
        /// Page name (defaults to the homepage)
        page: Option<String>,

        /// Do not fetch remote includes; they render as failures
        #[arg(long)]
        offline: bool,
    },

    /// Print a page's raw text
    Show {
        page: String,
    },

    /// List all pages
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a page's text and commit it
    Edit {
        page: String,

        /// Read the new text from a file instead of stdin
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Delete a page and commit the removal
    Remove {
        page: String,
    },
}

#[derive(Serialize)]
struct PageEntry {
    name: String,
    title: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    gitwiki::log::init_with_debug(cli.debug);
    wlog!("gitwiki starting: {:?}", cli.command);

    let result = run(cli);
    if let Err(e) = &result {
        wlog_error!("{}", e);
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => WikiConfig::config_path()?,
    };
    let mut config = WikiConfig::load_from(&config_path)?;
    if let Some(repo) = &cli.repo {
        config.repo = Some(repo.to_string_lossy().into_owned());
    }
    let repo_path = config.repo_path()?;
    let open = || GitStore::open(&repo_path, &config.extension);

    match cli.command {
        Command::Init => {
            let store = GitStore::init(&repo_path, &config.extension, &config.homepage)?;
            println!("Initialized wiki in {}", store.repo_path().display());
            if !config_path.exists() {
                config.save_to(&config_path)?;
                println!("Wrote config to {}", config_path.display());
            }
        }
        Command::Render { page, offline } => {
            let page = page.unwrap_or_else(|| config.homepage.clone());
            let fetcher: Box<dyn UrlFetcher> = if offline {
                Box::new(StaticFetcher::default())
            } else {
                Box::new(HttpFetcher::new(config.fetch_timeout_secs.map(Duration::from_secs))?)
            };
            let store = open()?;
            let renderer = Renderer::new(&config, &store, fetcher.as_ref());
            println!("{}", renderer.render_named(&page)?);
        }
        Command::Show { page } => {
            let text = open()?
                .find(&page)?
                .ok_or_else(|| Error::PageNotFound(page.clone()))?;
            print!("{}", text);
        }
        Command::List { json } => {
            let entries: Vec<PageEntry> = open()?
                .list_all()?
                .into_iter()
                .map(|(name, _)| PageEntry {
                    title: titleize(&name),
                    name,
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No pages found.");
            } else {
                for entry in entries {
                    println!("{}\t{}", entry.name, entry.title);
                }
            }
        }
        Command::Edit { page, file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            open()?.save(&page, &content)?;
        }
        Command::Remove { page } => {
            open()?.remove(&page)?;
        }
    }
    Ok(())
}
