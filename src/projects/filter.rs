//! Tab, tag and search filtering over the project list

use super::Project;

/// Tab name that shows every category
pub const ALL_TAB: &str = "all";

/// The project list's view state: selected tab, tag chip and search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub query: Option<String>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one category; `"all"` clears the restriction
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.eq_ignore_ascii_case(ALL_TAB) {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Case-insensitive text search over title, description, category and tags
    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into().trim().to_lowercase();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none() && self.query.is_none()
    }

    pub fn matches(&self, project: &Project) -> bool {
        if let Some(category) = &self.category {
            if !project.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !project.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let hit = project.title.to_lowercase().contains(&query)
                || project.description.to_lowercase().contains(&query)
                || project.category.to_lowercase().contains(&query)
                || project
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Matching projects, in catalog order
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, category: &str, tags: &[&str]) -> Project {
        Project {
            title: title.to_string(),
            description: format!("About {}", title),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Project> {
        vec![
            project("Tiny Shell", "Systems", &["rust", "cli"]),
            project("Photo Wall", "Web", &["typescript", "react"]),
            project("Ledger", "Web", &["rust", "wasm"]),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let projects = sample();
        let filter = ProjectFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&projects).len(), 3);
    }

    #[test]
    fn test_category_tab() {
        let projects = sample();
        let titles: Vec<_> = ProjectFilter::new()
            .category("web")
            .apply(&projects)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Photo Wall", "Ledger"]);

        let filter = ProjectFilter::new().category("All");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_tag_and_category_combine() {
        let projects = sample();
        let found = ProjectFilter::new()
            .category("Web")
            .tag("Rust")
            .apply(&projects);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Ledger");
    }

    #[test]
    fn test_search() {
        let projects = sample();
        let found = ProjectFilter::new().search("  SHELL ").apply(&projects);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Tiny Shell");

        let found = ProjectFilter::new().search("wasm").apply(&projects);
        assert_eq!(found[0].title, "Ledger");

        assert!(ProjectFilter::new().search("   ").is_empty());
        assert!(ProjectFilter::new().search("cobol").apply(&projects).is_empty());
    }
}
