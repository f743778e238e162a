//! Create a new blog post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a new post scaffold in the posts directory, returning its path
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&folio.posts_dir)?;
    let file_path = folio.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("Post already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: \"{}\"\ndate: {}\ndescription: \"\"\ntags: []\n---\n\n",
        title,
        now.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
