//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped in a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/hello/") // -> "/me/blog/hello/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let path = url_for(config, path);
    if path.starts_with("http://") || path.starts_with("https://") {
        return path;
    }
    format!("{}{}", config.url.trim_end_matches('/'), path)
}

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Output directory of a blog post, relative to the public directory
pub fn post_path(slug: &str) -> String {
    format!("blog/{}/", slug)
}

/// Link path of a blog post, relative to the site root
pub fn post_url(slug: &str) -> String {
    format!("blog/{}/", encode_segment(slug))
}

/// Output path of a tag listing, relative to the site root
pub fn tag_path(tag: &str) -> String {
    format!("tags/{}/", slug::slugify(tag))
}

/// Output path of a project tab, relative to the site root
pub fn tab_path(tab_slug: &str) -> String {
    if tab_slug == crate::projects::ALL_TAB {
        "projects/".to_string()
    } else {
        format!("projects/{}/", tab_slug)
    }
}
