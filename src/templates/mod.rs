//! Built-in portfolio templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for `.html`
//! templates; rendered markdown is marked `safe` where it is injected.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{MenuItem, SocialLink};

/// Template renderer with the embedded portfolio theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("profile.html", include_str!("folio/profile.html")),
            ("projects.html", include_str!("folio/projects.html")),
            ("blog.html", include_str!("folio/blog.html")),
            ("post.html", include_str!("folio/post.html")),
            ("tag.html", include_str!("folio/tag.html")),
            ("404.html", include_str!("folio/404.html")),
            // Partials
            ("partials/head.html", include_str!("folio/partials/head.html")),
            (
                "partials/header.html",
                include_str!("folio/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("folio/partials/footer.html"),
            ),
            (
                "partials/post_item.html",
                include_str!("folio/partials/post_item.html"),
            ),
            (
                "partials/project_card.html",
                include_str!("folio/partials/project_card.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                // Keep block boundaries from gluing words together
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    let collapsed = result.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(tera::Value::String(collapsed))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,
    /// Menu with paths already resolved against the site root
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub headline: String,
    pub bio_html: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub links: Vec<SocialLink>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_slug: String,
    pub tags: Vec<String>,
    pub repo: Option<String>,
    pub demo: Option<String>,
    pub image: Option<String>,
    pub year: Option<u16>,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabData {
    pub name: String,
    pub url: String,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StackEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub date_display: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagLink>,
    pub content: String,
    pub excerpt: Option<String>,
    pub url: String,
    pub reading_minutes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagData {
    pub name: String,
    pub url: String,
    pub count: usize,
    pub posts: Vec<PostData>,
}
