//! Generator module - writes the static portfolio site using the built-in templates

use anyhow::Result;
use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::config::MenuItem;
use crate::content::{Document, MarkdownRenderer};
use crate::helpers::{full_url_for, post_path, post_url, tab_path, tag_path, url_for};
use crate::projects::{Catalog, Project, Tab};
use crate::templates::{
    NavPost, PostData, ProfileData, ProjectData, SiteData, StackEntry, TabData, TagData, TagLink,
    TemplateRenderer,
};
use crate::Folio;

/// Default stylesheet, written before user assets so they can replace it
const DEFAULT_STYLESHEET: &str = include_str!("../templates/folio/style.css");

/// Number of posts shown on the profile page
const RECENT_POSTS: usize = 3;

/// One entry in `search.json`
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub url: String,
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::new(),
        })
    }

    /// Generate the entire site
    ///
    /// `posts` are expected newest first, as returned by the content loader.
    pub fn generate(&self, posts: &[Document], catalog: &Catalog) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.write_file("css/style.css", DEFAULT_STYLESHEET)?;
        self.copy_static_assets()?;

        let site = self.build_site_data();
        let post_data: Vec<PostData> = posts.iter().map(|doc| self.build_post_data(doc)).collect();

        self.generate_profile_page(&site, catalog, &post_data)?;
        self.generate_project_pages(&site, catalog)?;
        self.generate_blog_index(&site, &post_data)?;
        self.generate_post_pages(&site, &post_data)?;
        self.generate_tag_pages(&site, &post_data)?;
        self.generate_not_found_page(&site)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    fn build_site_data(&self) -> SiteData {
        let config = &self.folio.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
            language: config.language.clone(),
            menu: config
                .menu
                .iter()
                .map(|item| MenuItem {
                    name: item.name.clone(),
                    path: url_for(config, &item.path),
                })
                .collect(),
        }
    }

    fn build_post_data(&self, doc: &Document) -> PostData {
        let config = &self.folio.config;
        let (excerpt, full) = MarkdownRenderer::split_excerpt(&doc.body);

        PostData {
            slug: doc.slug.clone(),
            title: doc.meta.title.clone(),
            date: doc.meta.date.clone(),
            date_display: doc.formatted_date(&config.date_format),
            description: doc.meta.description.clone(),
            tags: doc
                .meta
                .tags
                .iter()
                .map(|tag| TagLink {
                    name: tag.clone(),
                    url: url_for(config, &tag_path(tag)),
                })
                .collect(),
            content: self.markdown.render(&full),
            excerpt: excerpt.map(|e| self.markdown.render(&e)),
            url: url_for(config, &post_url(&doc.slug)),
            reading_minutes: doc.reading_minutes(),
        }
    }

    /// Project card data; `tabs` gives the category's page slug
    fn build_project_data(project: &Project, tabs: &[Tab]) -> ProjectData {
        let category_slug = tabs
            .iter()
            .skip(1)
            .find(|t| t.name.eq_ignore_ascii_case(&project.category))
            .map(|t| t.slug.clone())
            .unwrap_or_default();

        ProjectData {
            title: project.title.clone(),
            description: project.description.clone(),
            category: project.category.clone(),
            category_slug,
            tags: project.tags.clone(),
            repo: project.repo.clone(),
            demo: project.demo.clone(),
            image: project.image.clone(),
            year: project.year,
            featured: project.featured,
        }
    }

    /// Create base context with common data
    fn create_base_context(
        &self,
        site: &SiteData,
        current: &str,
        page_title: Option<&str>,
        page_description: Option<&str>,
    ) -> Context {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("current", &url_for(&self.folio.config, current));
        context.insert("page_title", &page_title);
        context.insert("page_description", &page_description);
        context.insert("year", &chrono::Local::now().year());
        context
    }

    fn generate_profile_page(
        &self,
        site: &SiteData,
        catalog: &Catalog,
        posts: &[PostData],
    ) -> Result<()> {
        let profile = &self.folio.config.profile;
        let profile_data = ProfileData {
            name: if profile.name.is_empty() {
                self.folio.config.author.clone()
            } else {
                profile.name.clone()
            },
            headline: profile.headline.clone(),
            bio_html: self.markdown.render(&profile.bio),
            avatar: profile.avatar.clone(),
            location: profile.location.clone(),
            email: profile.email.clone(),
            links: profile.links.clone(),
            skills: profile.skills.clone(),
        };
        let tabs = catalog.tabs();
        let featured: Vec<ProjectData> = catalog
            .featured()
            .into_iter()
            .map(|p| Self::build_project_data(p, &tabs))
            .collect();
        let recent: Vec<&PostData> = posts.iter().take(RECENT_POSTS).collect();

        let mut context = self.create_base_context(site, "", None, Some(profile.headline.as_str()));
        context.insert("profile", &profile_data);
        context.insert("featured", &featured);
        context.insert("recent_posts", &recent);

        let html = self.templates.render("profile.html", &context)?;
        self.write_page("", &html)
    }

    /// One page per tab: `projects/` for all, `projects/<category>/` for each category
    fn generate_project_pages(&self, site: &SiteData, catalog: &Catalog) -> Result<()> {
        let config = &self.folio.config;
        let tabs = catalog.tabs();
        let stack: Vec<StackEntry> = catalog
            .tags()
            .into_iter()
            .map(|(name, count)| StackEntry { name, count })
            .collect();

        for tab in &tabs {
            let tab_data: Vec<TabData> = tabs
                .iter()
                .map(|t| TabData {
                    name: t.name.clone(),
                    url: url_for(config, &tab_path(&t.slug)),
                    count: t.count,
                    active: t.slug == tab.slug,
                })
                .collect();

            let projects: Vec<ProjectData> = catalog
                .filter(&tab.filter())
                .into_iter()
                .map(|p| Self::build_project_data(p, &tabs))
                .collect();

            let path = tab_path(&tab.slug);
            let mut context = self.create_base_context(site, "projects/", Some("Projects"), None);
            context.insert("tabs", &tab_data);
            context.insert("stack", &stack);
            context.insert("projects", &projects);

            let html = self.templates.render("projects.html", &context)?;
            self.write_page(&path, &html)?;
        }

        tracing::debug!("Generated {} project tabs", tabs.len());
        Ok(())
    }

    fn generate_blog_index(&self, site: &SiteData, posts: &[PostData]) -> Result<()> {
        let tags: Vec<TagData> = group_by_tag(posts)
            .into_values()
            .map(|mut tag| {
                // The tag cloud only needs counts
                tag.posts.clear();
                tag
            })
            .collect();

        let mut context = self.create_base_context(site, "blog/", Some("Blog"), None);
        context.insert("posts", posts);
        context.insert("tags", &tags);
        context.insert("search_index", &url_for(&self.folio.config, "search.json"));

        let html = self.templates.render("blog.html", &context)?;
        self.write_page("blog/", &html)
    }

    fn generate_post_pages(&self, site: &SiteData, posts: &[PostData]) -> Result<()> {
        for (i, post) in posts.iter().enumerate() {
            // Posts are newest first: "prev" is the older neighbour
            let prev = posts.get(i + 1).map(|p| NavPost {
                title: p.title.clone(),
                url: p.url.clone(),
            });
            let next = i.checked_sub(1).and_then(|j| posts.get(j)).map(|p| NavPost {
                title: p.title.clone(),
                url: p.url.clone(),
            });

            let mut context = self.create_base_context(
                site,
                "blog/",
                Some(post.title.as_str()),
                post.description.as_deref(),
            );
            context.insert("post", post);
            context.insert("prev", &prev);
            context.insert("next", &next);

            let html = self.templates.render("post.html", &context)?;
            self.write_page(&post_path(&post.slug), &html)?;
        }

        tracing::debug!("Generated {} post pages", posts.len());
        Ok(())
    }

    fn generate_tag_pages(&self, site: &SiteData, posts: &[PostData]) -> Result<()> {
        for (slug, tag) in group_by_tag(posts) {
            let title = format!("#{}", tag.name);
            let mut context = self.create_base_context(site, "blog/", Some(title.as_str()), None);
            context.insert("tag", &tag);

            let html = self.templates.render("tag.html", &context)?;
            self.write_page(&tag_path(&slug), &html)?;
        }
        Ok(())
    }

    fn generate_not_found_page(&self, site: &SiteData) -> Result<()> {
        let context = self.create_base_context(site, "404.html", Some("Not found"), None);
        let html = self.templates.render("404.html", &context)?;
        self.write_file("404.html", &html)
    }

    /// Write `search.json`, the index behind the blog search box
    fn generate_search_index(&self, posts: &[Document]) -> Result<()> {
        let config = &self.folio.config;
        let entries: Vec<SearchEntry> = posts
            .iter()
            .map(|doc| SearchEntry {
                slug: doc.slug.clone(),
                title: doc.meta.title.clone(),
                date: doc.meta.date.clone(),
                description: doc.meta.description.clone(),
                tags: doc.meta.tags.clone(),
                url: full_url_for(config, &post_url(&doc.slug)),
            })
            .collect();

        let json = serde_json::to_string_pretty(&entries)?;
        self.write_file("search.json", &json)
    }

    /// Copy non-markdown files from the content directory
    fn copy_static_assets(&self) -> Result<()> {
        let content_dir = &self.folio.content_dir;
        if !content_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            // Skip markdown files (they are processed separately)
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }
            if path == self.folio.projects_file || path.starts_with(&self.folio.public_dir) {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.folio.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            tracing::debug!("Copied asset {:?}", relative);
        }

        Ok(())
    }

    /// Write a page at `path/index.html`, relative to the public directory
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        let path = path.trim_matches('/');
        let file = if path.is_empty() {
            "index.html".to_string()
        } else {
            format!("{}/index.html", path)
        };
        self.write_file(&file, html)
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let dest = self.folio.public_dir.join(Path::new(relative));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, content)?;
        Ok(())
    }
}

/// Group posts by tag slug, most used tags first
fn group_by_tag(posts: &[PostData]) -> IndexMap<String, TagData> {
    let mut tags: IndexMap<String, TagData> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            let entry = tags
                .entry(slug::slugify(&tag.name))
                .or_insert_with(|| TagData {
                    name: tag.name.clone(),
                    url: tag.url.clone(),
                    count: 0,
                    posts: Vec::new(),
                });
            entry.count += 1;
            entry.posts.push(post.clone());
        }
    }
    tags.sort_by(|_, a, _, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        fs::write(
            base.join("_config.yml"),
            r#"
title: Jane Roe
url: https://jane.dev
profile:
  name: Jane Roe
  headline: Systems programmer
  bio: "I like **small** tools. <script>no</script>"
"#,
        )
        .unwrap();

        let blog = base.join("content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("first.md"),
            "---\ntitle: First\ndate: 2023-05-05\ntags: [rust]\n---\nHello <world>",
        )
        .unwrap();
        fs::write(
            blog.join("second.md"),
            "---\ntitle: Second\ndate: 2024-01-01\ntags: [rust, Web Dev]\n---\nIntro\n<!-- more -->\n## More",
        )
        .unwrap();
        fs::write(
            base.join("content/projects.yml"),
            "- title: Tiny Shell\n  category: Systems\n  featured: true\n- title: Photo Wall\n  category: Web\n",
        )
        .unwrap();
        fs::create_dir_all(base.join("content/img")).unwrap();
        fs::write(base.join("content/img/me.png"), [0u8, 1, 2]).unwrap();
        tmp
    }

    fn build(tmp: &TempDir) -> Folio {
        let folio = Folio::new(tmp.path()).unwrap();
        let posts = folio.posts().list();
        let catalog = folio.catalog().unwrap();
        Generator::new(&folio)
            .unwrap()
            .generate(&posts, &catalog)
            .unwrap();
        folio
    }

    #[test]
    fn test_generate_writes_site() {
        let tmp = site_fixture();
        let folio = build(&tmp);
        let public = &folio.public_dir;

        for page in [
            "index.html",
            "projects/index.html",
            "projects/systems/index.html",
            "projects/web/index.html",
            "blog/index.html",
            "blog/first/index.html",
            "blog/second/index.html",
            "tags/rust/index.html",
            "tags/web-dev/index.html",
            "404.html",
            "search.json",
            "css/style.css",
            "img/me.png",
        ] {
            assert!(public.join(page).is_file(), "missing {}", page);
        }
        assert!(!public.join("projects.yml").exists());
    }

    #[test]
    fn test_post_page_renders_markdown() {
        let tmp = site_fixture();
        let folio = build(&tmp);

        let first = fs::read_to_string(folio.public_dir.join("blog/first/index.html")).unwrap();
        assert!(first.contains("<p>Hello &lt;world&gt;</p>"));
        assert!(!first.contains("<world>"));

        let second = fs::read_to_string(folio.public_dir.join("blog/second/index.html")).unwrap();
        assert!(second.contains("<h2>More</h2>"));
        assert!(!second.contains("&lt;!-- more --&gt;"));
    }

    #[test]
    fn test_profile_bio_is_escaped() {
        let tmp = site_fixture();
        let folio = build(&tmp);

        let index = fs::read_to_string(folio.public_dir.join("index.html")).unwrap();
        assert!(index.contains("<strong>small</strong>"));
        assert!(!index.contains("<script>no</script>"));
        assert!(index.contains("Tiny Shell"));
    }

    #[test]
    fn test_project_tabs_filter() {
        let tmp = site_fixture();
        let folio = build(&tmp);

        let web = fs::read_to_string(folio.public_dir.join("projects/web/index.html")).unwrap();
        assert!(web.contains("Photo Wall"));
        assert!(!web.contains("Tiny Shell"));
    }

    #[test]
    fn test_project_tabs_keep_distinct_pages() {
        let tmp = site_fixture();
        fs::write(
            tmp.path().join("content/projects.yml"),
            "- title: Alpha\n  category: Systems\n- title: Beta\n  category: \"!!!\"\n\
             - title: Gamma\n  category: C\n- title: Delta\n  category: C++\n",
        )
        .unwrap();
        let folio = build(&tmp);
        let page = |path: &str| {
            fs::read_to_string(folio.public_dir.join(path).join("index.html")).unwrap()
        };

        let all = page("projects");
        for title in ["Alpha", "Beta", "Gamma", "Delta"] {
            assert!(all.contains(title), "all tab lost {}", title);
        }

        let other = page("projects/other");
        assert!(other.contains("Beta"));
        assert!(!other.contains("Alpha"));

        let c = page("projects/c");
        assert!(c.contains("Gamma"));
        assert!(!c.contains("Delta"));

        let cpp = page("projects/c-2");
        assert!(cpp.contains("Delta"));
        assert!(!cpp.contains("Gamma"));
    }

    #[test]
    fn test_post_with_spaced_file_name() {
        let tmp = site_fixture();
        fs::write(
            tmp.path().join("content/blog/my post.md"),
            "---\ntitle: Spaced\ndate: 2022-02-02\n---\nBody",
        )
        .unwrap();
        let folio = build(&tmp);

        assert!(folio.public_dir.join("blog/my post/index.html").is_file());
        let json = fs::read_to_string(folio.public_dir.join("search.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries[2]["url"], "https://jane.dev/blog/my%20post/");

        let blog = fs::read_to_string(folio.public_dir.join("blog/index.html")).unwrap();
        assert!(blog.contains("my%20post"));
    }

    #[test]
    fn test_search_index_order() {
        let tmp = site_fixture();
        let folio = build(&tmp);

        let json = fs::read_to_string(folio.public_dir.join("search.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["slug"], "second");
        assert_eq!(entries[1]["url"], "https://jane.dev/blog/first/");
    }
}
