//! Document and metadata models

use indexmap::IndexMap;
use serde::Serialize;

use super::frontmatter::{parse_date_string, FrontMatter};

/// Words per minute used for reading time estimates
const READING_WPM: usize = 200;

/// Metadata record from a document's front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Document title, falling back to the slug
    pub title: String,

    /// Opaque, sortable date string
    pub date: Option<String>,

    pub description: Option<String>,

    pub tags: Vec<String>,

    /// Unrecognised front-matter keys
    pub extra: IndexMap<String, String>,
}

impl Metadata {
    /// Build a metadata record, defaulting the title to `slug`
    pub fn from_front_matter(fm: FrontMatter, slug: &str) -> Self {
        Self {
            title: fm.title.unwrap_or_else(|| slug.to_string()),
            date: fm.date,
            description: fm.description,
            tags: fm.tags,
            extra: fm.extra,
        }
    }
}

/// A markdown document loaded from the content directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Identifier, taken from the file stem
    pub slug: String,

    pub meta: Metadata,

    /// Raw markdown body, front-matter removed
    pub body: String,
}

impl Document {
    /// Split `source` into metadata and body
    pub fn from_source(slug: &str, source: &str) -> Self {
        let (fm, body) = FrontMatter::parse(source);
        Self {
            slug: slug.to_string(),
            meta: Metadata::from_front_matter(fm, slug),
            body: body.to_string(),
        }
    }

    /// Key used to order listings; undated documents sort as the empty string
    pub fn sort_key(&self) -> &str {
        self.meta.date.as_deref().unwrap_or("")
    }

    /// Format the date with a chrono format string, if it parses as a date
    pub fn formatted_date(&self, format: &str) -> Option<String> {
        let date = self.meta.date.as_deref()?;
        parse_date_string(date).map(|d| d.format(format).to_string())
    }

    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Estimated reading time in whole minutes, never less than one
    pub fn reading_minutes(&self) -> usize {
        self.word_count().div_ceil(READING_WPM).max(1)
    }
}
