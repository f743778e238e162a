//! Front-matter parsing

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

/// Line that opens and closes a front-matter header
const DELIMITER: &str = "---";

/// Front-matter data from a content file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,

    /// Any other `key: value` lines, in file order
    pub extra: IndexMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without a complete `---` header is returned whole with
    /// default front-matter.
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');

        let Some(first) = lines.next() else {
            return (FrontMatter::default(), content);
        };
        if first.trim_end() != DELIMITER {
            return (FrontMatter::default(), content);
        }

        let header_start = first.len();
        let mut offset = header_start;
        for line in lines {
            if line.trim_end() == DELIMITER {
                let header = &content[header_start..offset];
                let remaining = content[offset + line.len()..].trim_start_matches(['\n', '\r']);
                return (Self::from_header(header), remaining);
            }
            offset += line.len();
        }

        tracing::debug!("Unterminated front-matter, treating file as plain content");
        (FrontMatter::default(), content)
    }

    fn from_header(header: &str) -> Self {
        let mut fm = FrontMatter::default();

        for line in header.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                continue;
            }

            match key {
                "title" => fm.title = non_empty(unquote(value)),
                "date" => fm.date = non_empty(unquote(value)),
                "description" => fm.description = non_empty(unquote(value)),
                "tags" => fm.tags = parse_list(value),
                _ => {
                    fm.extra.insert(key.to_string(), unquote(value).to_string());
                }
            }
        }

        fm
    }

    /// Parse the date string into a calendar date, when it is in a known format
    pub fn parse_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Unpack `[a, "b", c]` into its items; a bare value becomes a single item
fn parse_list(value: &str) -> Vec<String> {
    match value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        None => non_empty(unquote(value)).into_iter().collect(),
    }
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // RFC 3339 / ISO 8601 with offset
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
description: "A first post"
tags: [rust, 'web', "notes"]
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.date, Some("2024-01-15".to_string()));
        assert_eq!(fm.description, Some("A first post".to_string()));
        assert_eq!(fm.tags, vec!["rust", "web", "notes"]);
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let content = "---\ntitle: 'Rust: a retrospective'\ncover: https://x.io/a.png\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("Rust: a retrospective".to_string()));
        assert_eq!(fm.extra.get("cover").map(String::as_str), Some("https://x.io/a.png"));
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_mismatched_quotes_kept() {
        let (fm, _) = FrontMatter::parse("---\ntitle: \"half'\n---\n");
        assert_eq!(fm.title, Some("\"half'".to_string()));
    }

    #[test]
    fn test_single_tag_and_empty_list() {
        let (fm, _) = FrontMatter::parse("---\ntags: notes\n---\n");
        assert_eq!(fm.tags, vec!["notes"]);

        let (fm, _) = FrontMatter::parse("---\ntags: []\n---\n");
        assert!(fm.tags.is_empty());

        let (fm, _) = FrontMatter::parse("---\ntags: [a, , b]\n---\n");
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo header here.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let content = "---\ntitle: Oops\n\nBody without a closing line.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_crlf_frontmatter() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, Some("Windows".to_string()));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_lines_without_colon_ignored() {
        let (fm, _) = FrontMatter::parse("---\njust words\ntitle: Kept\n---\n");
        assert_eq!(fm.title, Some("Kept".to_string()));
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let d = fm.parse_date().unwrap();
        assert_eq!(d.format("%Y-%m-%d").to_string(), "2024-01-15");

        assert_eq!(
            parse_date_string("2023/05/05"),
            NaiveDate::from_ymd_opt(2023, 5, 5)
        );
        assert_eq!(parse_date_string("someday"), None);
    }
}
