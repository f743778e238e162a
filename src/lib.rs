//! folio: a small static generator for a personal portfolio
//!
//! A site is a profile page, a filterable project list and a markdown blog.
//! Blog posts use a restricted markdown dialect rendered by
//! [`content::MarkdownRenderer`]; the generator lays everything out with
//! embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod projects;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::ContentLoader;
use projects::Catalog;
use store::{NoopStore, Store};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application: a site rooted at a base directory
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
    /// Blog post directory
    pub posts_dir: PathBuf,
    /// Static project table
    pub projects_file: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    store: Arc<dyn Store>,
}

impl Folio {
    /// Create a site from a directory, without a backing store
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        Self::with_store(base_dir, Arc::new(NoopStore))
    }

    /// Create a site from a directory, reading extra records from `store`
    pub fn with_store<P: AsRef<Path>>(base_dir: P, store: Arc<dyn Store>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let posts_dir = content_dir.join(&config.posts_dir);
        let projects_file = content_dir.join(&config.projects_file);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            posts_dir,
            projects_file,
            public_dir,
            store,
        })
    }

    /// Re-read the configuration, keeping the same store
    pub fn reload(&self) -> Result<Self> {
        Self::with_store(&self.base_dir, Arc::clone(&self.store))
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Loader over the blog post directory
    pub fn posts(&self) -> ContentLoader {
        ContentLoader::new(&self.posts_dir)
    }

    /// Load the project catalog
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.projects_file, self.store())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.posts_dir, tmp.path().join("content").join("blog"));
        assert_eq!(folio.public_dir, tmp.path().join("public"));
        assert!(folio.posts().list().is_empty());
        assert!(folio.catalog().unwrap().is_empty());
    }

    #[test]
    fn test_config_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "content_dir: src\nposts_dir: posts\npublic_dir: dist\n",
        )
        .unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.posts_dir, tmp.path().join("src").join("posts"));
        assert_eq!(folio.public_dir, tmp.path().join("dist"));
    }

    #[test]
    fn test_bad_config_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "menu: 7\n").unwrap();
        assert!(Folio::new(tmp.path()).is_err());
    }
}
