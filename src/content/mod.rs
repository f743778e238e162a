//! Content module - handles documents, front-matter and markdown rendering

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{Document, Metadata};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{html_escape, Fragment, MarkdownRenderer, Pass, PIPELINE};
