//! List site content

use anyhow::Result;

use crate::projects::ProjectFilter;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str, filter: &ProjectFilter) -> Result<()> {
    for line in listing(folio, content_type, filter)? {
        println!("{}", line);
    }
    Ok(())
}

/// Build the listing lines for `content_type`
pub fn listing(folio: &Folio, content_type: &str, filter: &ProjectFilter) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts = folio.posts().list();
            lines.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                lines.push(format!(
                    "  {} - {} [{}]",
                    post.meta.date.as_deref().unwrap_or("undated"),
                    post.meta.title,
                    post.slug
                ));
            }
        }
        "project" | "projects" => {
            let catalog = folio.catalog()?;
            let projects = catalog.filter(filter);
            lines.push(format!("Projects ({} of {}):", projects.len(), catalog.len()));
            for project in projects {
                let marker = if project.featured { "*" } else { " " };
                lines.push(format!(
                    " {} {} ({}) [{}]",
                    marker,
                    project.title,
                    project.category,
                    project.tags.join(", ")
                ));
            }
        }
        "tab" | "tabs" => {
            let catalog = folio.catalog()?;
            let tabs = catalog.tabs();
            lines.push(format!("Tabs ({}):", tabs.len()));
            for tab in tabs {
                lines.push(format!("  {} ({})", tab.name, tab.count));
            }
        }
        "tag" | "tags" => {
            let posts = folio.posts().list();
            let mut tags: Vec<(String, usize)> = Vec::new();
            for tag in posts.iter().flat_map(|p| &p.meta.tags) {
                match tags.iter_mut().find(|(t, _)| t == tag) {
                    Some((_, count)) => *count += 1,
                    None => tags.push((tag.clone(), 1)),
                }
            }
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            lines.push(format!("Tags ({}):", tags.len()));
            for (tag, count) in tags {
                lines.push(format!("  {} ({})", tag, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, tab, tag",
                content_type
            );
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("a.md"), "---\ntitle: A\ndate: 2024-01-01\ntags: [rust, web]\n---\n").unwrap();
        fs::write(blog.join("b.md"), "---\ntitle: B\ntags: [rust]\n---\n").unwrap();
        fs::write(
            tmp.path().join("content/projects.yml"),
            "- title: Shell\n  category: Systems\n  tags: [rust]\n  featured: true\n- title: Gallery\n  category: Web\n",
        )
        .unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, folio)
    }

    #[test]
    fn test_list_posts() {
        let (_tmp, folio) = fixture();
        let lines = listing(&folio, "posts", &ProjectFilter::new()).unwrap();
        assert_eq!(
            lines,
            vec!["Posts (2):", "  2024-01-01 - A [a]", "  undated - B [b]"]
        );
    }

    #[test]
    fn test_list_projects_with_filter() {
        let (_tmp, folio) = fixture();
        let filter = ProjectFilter::new().tag("rust");
        let lines = listing(&folio, "projects", &filter).unwrap();
        assert_eq!(lines, vec!["Projects (1 of 2):", " * Shell (Systems) [rust]"]);
    }

    #[test]
    fn test_list_tabs_and_tags() {
        let (_tmp, folio) = fixture();
        let tabs = listing(&folio, "tabs", &ProjectFilter::new()).unwrap();
        assert_eq!(tabs, vec!["Tabs (3):", "  all (2)", "  Systems (1)", "  Web (1)"]);

        let tags = listing(&folio, "tags", &ProjectFilter::new()).unwrap();
        assert_eq!(tags, vec!["Tags (2):", "  rust (2)", "  web (1)"]);
    }

    #[test]
    fn test_list_unknown_type() {
        let (_tmp, folio) = fixture();
        assert!(listing(&folio, "widgets", &ProjectFilter::new()).is_err());
    }
}
