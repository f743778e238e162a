//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    /// Blog posts, relative to `content_dir`
    pub posts_dir: String,
    /// Project table, relative to `content_dir`
    pub projects_file: String,
    pub public_dir: String,

    // Writing
    /// chrono format used when displaying post dates
    pub date_format: String,

    // Navigation
    pub menu: Vec<MenuItem>,

    pub profile: Profile,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            posts_dir: "blog".to_string(),
            projects_file: "projects.yml".to_string(),
            public_dir: "public".to_string(),

            date_format: "%B %d, %Y".to_string(),

            menu: MenuItem::defaults(),

            profile: Profile::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    fn defaults() -> Vec<Self> {
        [("About", "/"), ("Projects", "/projects/"), ("Blog", "/blog/")]
            .into_iter()
            .map(|(name, path)| Self {
                name: name.to_string(),
                path: path.to_string(),
            })
            .collect()
    }
}

/// The person the portfolio is about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    /// Markdown, rendered with the post renderer
    pub bio: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub links: Vec<SocialLink>,
    pub skills: Vec<String>,
}

/// Profile link such as GitHub or Mastodon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Portfolio");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.posts_dir, "blog");
        assert_eq!(config.menu.len(), 3);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Jane's Corner
author: Jane Roe
url: https://jane.dev
profile:
  name: Jane Roe
  headline: Systems programmer
  bio: |
    I write **fast** things.
  links:
    - name: GitHub
      url: https://github.com/jane
analytics: plausible
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Jane's Corner");
        assert_eq!(config.url, "https://jane.dev");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.profile.name, "Jane Roe");
        assert_eq!(config.profile.links[0].name, "GitHub");
        assert!(config.profile.bio.contains("**fast**"));
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_load_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = SiteConfig::load(tmp.path().join("_config.yml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let path = tmp.path().join("_config.yml");
        fs::write(&path, "menu: 7").unwrap();
        assert!(matches!(
            SiteConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
