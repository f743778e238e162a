//! Content loader - loads markdown documents from a content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Document;

/// File extensions recognised as markdown documents
const EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Loads documents from a single directory (non recursive)
#[derive(Debug, Clone)]
pub struct ContentLoader {
    dir: PathBuf,
}

impl ContentLoader {
    /// Create a loader over `dir`
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load every document, newest first
    ///
    /// Documents without a date sort last. A missing or unreadable
    /// directory yields an empty listing.
    pub fn list(&self) -> Vec<Document> {
        if !self.dir.is_dir() {
            tracing::debug!("Content directory {:?} not found", self.dir);
            return Vec::new();
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read_to_string(path) {
                Ok(source) => documents.push(Document::from_source(slug, &source)),
                Err(e) => {
                    tracing::warn!("Failed to load document {:?}: {}", path, e);
                }
            }
        }

        // Sort by date descending; the sort is stable so ties keep slug order
        documents.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));

        tracing::debug!("Loaded {} documents from {:?}", documents.len(), self.dir);
        documents
    }

    /// Look up a single document by slug
    pub fn get(&self, slug: &str) -> Option<Document> {
        if !is_plain_slug(slug) {
            return None;
        }

        EXTENSIONS.iter().find_map(|ext| {
            let path = self.dir.join(format!("{}.{}", slug, ext));
            if !path.is_file() {
                return None;
            }
            match fs::read_to_string(&path) {
                Ok(source) => Some(Document::from_source(slug, &source)),
                Err(e) => {
                    tracing::warn!("Failed to load document {:?}: {}", path, e);
                    None
                }
            }
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// A slug must name a file directly inside the content directory
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_list_sorts_by_date_descending() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "older.md", "---\ntitle: Older\ndate: 2023-05-05\n---\nB");
        write(tmp.path(), "undated.md", "---\ntitle: Undated\n---\nC");
        write(tmp.path(), "newer.md", "---\ntitle: Newer\ndate: 2024-01-01\n---\nA");

        let docs = ContentLoader::new(tmp.path()).list();
        let slugs: Vec<_> = docs.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older", "undated"]);
    }

    #[test]
    fn test_list_skips_non_markdown_and_subdirs() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "post.markdown", "Body");
        write(tmp.path(), "notes.txt", "ignored");
        fs::create_dir(tmp.path().join("drafts")).unwrap();
        write(&tmp.path().join("drafts"), "hidden.md", "ignored");

        let docs = ContentLoader::new(tmp.path()).list();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].slug, "post");
        assert_eq!(docs[0].meta.title, "post");
    }

    #[test]
    fn test_list_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let docs = ContentLoader::new(tmp.path().join("nope")).list();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_get_by_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "hello.md", "---\ntitle: Hello\n---\nHi there");

        let loader = ContentLoader::new(tmp.path());
        let doc = loader.get("hello").unwrap();
        assert_eq!(doc.meta.title, "Hello");
        assert_eq!(doc.body, "Hi there");
    }

    #[test]
    fn test_get_missing_slug() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::new(tmp.path());
        assert!(loader.get("missing").is_none());
        assert!(loader.get("../etc/passwd").is_none());
        assert!(loader.get("").is_none());
    }
}
