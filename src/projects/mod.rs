//! Project catalog - the portfolio's project metadata table

mod filter;

pub use filter::{ProjectFilter, ALL_TAB};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::store::{Record, Store};

/// Store collection holding extra project records
pub const PROJECTS_COLLECTION: &str = "projects";

/// Tab slug used when a category name has no slug-safe characters
const FALLBACK_TAB_SLUG: &str = "other";

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Tech stack
    pub tags: Vec<String>,
    pub repo: Option<String>,
    pub demo: Option<String>,
    pub image: Option<String>,
    pub year: Option<u16>,
    pub featured: bool,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: "Other".to_string(),
            tags: Vec::new(),
            repo: None,
            demo: None,
            image: None,
            year: None,
            featured: false,
        }
    }
}

/// One project tab: `all` or a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

impl Tab {
    /// Filter selecting the projects shown under this tab
    pub fn filter(&self) -> ProjectFilter {
        if self.slug == ALL_TAB {
            ProjectFilter::new()
        } else {
            ProjectFilter {
                category: Some(self.name.clone()),
                ..ProjectFilter::default()
            }
        }
    }
}

/// Slug for a new category tab, distinct from every tab already taken
///
/// Categories that slugify to nothing fall back to `other`. Clashes,
/// including with the `all` tab, get a numeric suffix.
fn unique_tab_slug(category: &str, tabs: &[Tab]) -> String {
    let mut base = slug::slugify(category);
    if base.is_empty() {
        base = FALLBACK_TAB_SLUG.to_string();
    }

    let mut slug = base.clone();
    let mut n = 2;
    while tabs.iter().any(|t| t.slug == slug) {
        slug = format!("{}-{}", base, n);
        n += 1;
    }
    slug
}

/// The full project list, in display order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Load the static project table, then append records from `store`
    ///
    /// A missing project file is an empty table.
    pub fn load(path: &Path, store: &dyn Store) -> Result<Self> {
        let mut projects = if path.is_file() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            serde_yaml::from_str::<Vec<Project>>(&content)
                .with_context(|| format!("Failed to parse projects from {:?}", path))?
        } else {
            tracing::debug!("No project file at {:?}", path);
            Vec::new()
        };

        let records = store.select(PROJECTS_COLLECTION)?;
        projects.extend(from_records(records));

        tracing::debug!("Loaded {} projects", projects.len());
        Ok(Self { projects })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn featured(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.featured).collect()
    }

    pub fn filter(&self, filter: &ProjectFilter) -> Vec<&Project> {
        filter.apply(&self.projects)
    }

    /// `all` followed by each category in first-seen order
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![Tab {
            name: ALL_TAB.to_string(),
            slug: ALL_TAB.to_string(),
            count: self.projects.len(),
        }];

        for project in &self.projects {
            match tabs
                .iter_mut()
                .skip(1)
                .find(|t| t.name.eq_ignore_ascii_case(&project.category))
            {
                Some(tab) => tab.count += 1,
                None => {
                    let slug = unique_tab_slug(&project.category, &tabs);
                    tabs.push(Tab {
                        name: project.category.clone(),
                        slug,
                        count: 1,
                    });
                }
            }
        }

        tabs
    }

    /// Distinct tags with usage counts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for tag in self.projects.iter().flat_map(|p| &p.tags) {
            match counts.iter_mut().find(|(t, _)| t == tag) {
                Some((_, count)) => *count += 1,
                None => counts.push((tag.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Convert store records into projects, skipping malformed ones
fn from_records(records: Vec<Record>) -> Vec<Project> {
    records
        .into_iter()
        .filter_map(
            |record| match serde_json::from_value(serde_json::Value::Object(record)) {
                Ok(project) => Some(project),
                Err(e) => {
                    tracing::warn!("Skipping malformed project record: {}", e);
                    None
                }
            },
        )
        .collect()
}
