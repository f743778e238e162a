//! Markdown rendering for the restricted dialect used by posts and the profile bio
//!
//! Rendering is a fixed sequence of named passes over a [`Fragment`]. Every
//! pass that produces markup parks it in the fragment's stash and leaves an
//! opaque token in the text, so later passes only ever see escaped source
//! text and tokens. Tokens are expanded once, after the last pass.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Delimits stash tokens inside fragment text
const MARK: char = '\u{E000}';

/// Marker separating a post excerpt from the rest of the body
const MORE_MARKER: &str = "<!-- more -->";

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```(.*?)```").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[([^\]\n]*)\]\((https?://[^)\s]+)\)").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`\n]+)`").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]\n]+)\]\((https?://[^)\s]+)\)").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*([^\n]+?)\*\*").unwrap();
    static ref H3: Regex = Regex::new(r"(?m)^### (.*)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?m)^## (.*)$").unwrap();
    static ref H1: Regex = Regex::new(r"(?m)^# (.*)$").unwrap();
    static ref BLOCK_BREAK: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref TOKEN: Regex = Regex::new(r"\x{E000}(\d+)\x{E000}").unwrap();
}

/// Whether a stashed piece of markup opens a block-level element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Block,
    Inline,
}

#[derive(Debug, Clone)]
struct Stashed {
    markup: String,
    level: Level,
}

/// Markup produced by earlier passes, addressed by token
#[derive(Debug, Clone, Default)]
struct Stash {
    entries: Vec<Stashed>,
}

impl Stash {
    /// Park `markup` and return the token that stands in for it
    fn push(&mut self, markup: impl Into<String>, level: Level) -> String {
        let index = self.entries.len();
        self.entries.push(Stashed {
            markup: markup.into(),
            level,
        });
        format!("{MARK}{index}{MARK}")
    }

    /// Surround user text with stashed open and close tags
    fn wrap(&mut self, open: impl Into<String>, inner: &str, close: &str, level: Level) -> String {
        let open = self.push(open, level);
        let close = self.push(close, Level::Inline);
        format!("{open}{inner}{close}")
    }

    /// Does `text` begin with a token for a block-level element?
    fn starts_with_block(&self, text: &str) -> bool {
        let Some(rest) = text.strip_prefix(MARK) else {
            return false;
        };
        let Some(end) = rest.find(MARK) else {
            return false;
        };
        rest[..end]
            .parse::<usize>()
            .ok()
            .and_then(|index| self.entries.get(index))
            .is_some_and(|entry| entry.level == Level::Block)
    }

    fn expand(&self, text: &str) -> String {
        TOKEN
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.entries.get(index))
                    // Stashed markup only ever holds tokens of earlier entries
                    .map(|entry| self.expand(&entry.markup))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// The document being rendered: escaped source text interleaved with tokens
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    text: String,
    stash: Stash,
}

impl Fragment {
    /// Start a fragment from raw, unescaped source text
    pub fn new(source: &str) -> Self {
        Self {
            text: source.to_string(),
            stash: Stash::default(),
        }
    }

    /// Current text, with produced markup still folded into tokens
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Expand every token into the markup it stands for
    pub fn into_markup(self) -> String {
        self.stash.expand(&self.text)
    }

    fn substitute<F>(self, re: &Regex, mut build: F) -> Self
    where
        F: FnMut(&Captures, &mut Stash) -> String,
    {
        let Fragment { text, mut stash } = self;
        let text = re
            .replace_all(&text, |caps: &Captures| build(caps, &mut stash))
            .into_owned();
        Fragment { text, stash }
    }
}

/// One named transformation in the rendering pipeline
#[derive(Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    apply: fn(Fragment) -> Fragment,
}

impl Pass {
    pub fn run(&self, fragment: Fragment) -> Fragment {
        (self.apply)(fragment)
    }
}

impl std::fmt::Debug for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pass").field("name", &self.name).finish()
    }
}

/// Passes in the order they must run
pub static PIPELINE: [Pass; 11] = [
    Pass { name: "escape", apply: escape },
    Pass { name: "code_blocks", apply: code_blocks },
    Pass { name: "images", apply: images },
    Pass { name: "inline_code", apply: inline_code },
    Pass { name: "links", apply: links },
    Pass { name: "bold", apply: bold },
    Pass { name: "h3", apply: h3 },
    Pass { name: "h2", apply: h2 },
    Pass { name: "h1", apply: h1 },
    Pass { name: "lists", apply: lists },
    Pass { name: "paragraphs", apply: paragraphs },
];

fn escape(fragment: Fragment) -> Fragment {
    // Source text can never forge a token
    let text = fragment
        .text
        .replace("\r\n", "\n")
        .replace(MARK, "\u{FFFD}");
    Fragment {
        text: html_escape(&text),
        stash: fragment.stash,
    }
}

fn code_blocks(fragment: Fragment) -> Fragment {
    fragment.substitute(&CODE_BLOCK, |caps, stash| {
        stash.push(
            format!("<pre><code>{}</code></pre>", caps[1].trim()),
            Level::Block,
        )
    })
}

fn images(fragment: Fragment) -> Fragment {
    fragment.substitute(&IMAGE, |caps, stash| {
        stash.push(
            format!(r#"<img src="{}" alt="{}" />"#, &caps[2], &caps[1]),
            Level::Block,
        )
    })
}

fn inline_code(fragment: Fragment) -> Fragment {
    fragment.substitute(&INLINE_CODE, |caps, stash| {
        stash.push(format!("<code>{}</code>", &caps[1]), Level::Inline)
    })
}

fn links(fragment: Fragment) -> Fragment {
    fragment.substitute(&LINK, |caps, stash| {
        stash.wrap(
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                &caps[2]
            ),
            &caps[1],
            "</a>",
            Level::Inline,
        )
    })
}

fn bold(fragment: Fragment) -> Fragment {
    fragment.substitute(&BOLD, |caps, stash| {
        stash.wrap("<strong>", &caps[1], "</strong>", Level::Inline)
    })
}

fn heading(fragment: Fragment, re: &Regex, level: u8) -> Fragment {
    fragment.substitute(re, |caps, stash| {
        stash.wrap(
            format!("<h{level}>"),
            &caps[1],
            &format!("</h{level}>"),
            Level::Block,
        )
    })
}

fn h3(fragment: Fragment) -> Fragment {
    heading(fragment, &H3, 3)
}

fn h2(fragment: Fragment) -> Fragment {
    heading(fragment, &H2, 2)
}

fn h1(fragment: Fragment) -> Fragment {
    heading(fragment, &H1, 1)
}

fn lists(fragment: Fragment) -> Fragment {
    let Fragment { text, mut stash } = fragment;
    let mut lines: Vec<String> = Vec::new();
    let mut items: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        match line.strip_prefix("- ") {
            Some(item) => items.push(item),
            None => {
                flush_list(&mut items, &mut lines, &mut stash);
                lines.push(line.to_string());
            }
        }
    }
    flush_list(&mut items, &mut lines, &mut stash);

    Fragment {
        text: lines.join("\n"),
        stash,
    }
}

/// Collapse a run of list lines into a single line holding one list
fn flush_list(items: &mut Vec<&str>, lines: &mut Vec<String>, stash: &mut Stash) {
    if items.is_empty() {
        return;
    }
    let mut list = stash.push("<ul>", Level::Block);
    for item in items.drain(..) {
        list.push_str(&stash.wrap("<li>", item, "</li>", Level::Inline));
    }
    list.push_str(&stash.push("</ul>", Level::Inline));
    lines.push(list);
}

fn paragraphs(fragment: Fragment) -> Fragment {
    let Fragment { text, mut stash } = fragment;
    let mut blocks = Vec::new();

    for block in BLOCK_BREAK.split(&text) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        if stash.starts_with_block(block) {
            blocks.push(block.to_string());
        } else {
            let br = stash.push("<br />", Level::Inline);
            let inner = block.replace('\n', &br);
            blocks.push(stash.wrap("<p>", &inner, "</p>", Level::Block));
        }
    }

    Fragment {
        text: blocks.join("\n"),
        stash,
    }
}

/// Markdown renderer for the restricted post dialect
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    passes: &'static [Pass],
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self { passes: &PIPELINE }
    }

    /// The passes this renderer runs, in order
    pub fn passes(&self) -> &[Pass] {
        self.passes
    }

    /// Render markdown to HTML. Total over all inputs.
    pub fn render(&self, markdown: &str) -> String {
        self.passes
            .iter()
            .fold(Fragment::new(markdown), |fragment, pass| {
                tracing::trace!(pass = pass.name, "running markdown pass");
                pass.run(fragment)
            })
            .into_markup()
    }

    /// Split a body at `<!-- more -->` into an optional excerpt and the full body
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        if let Some(pos) = content.find(MORE_MARKER) {
            let excerpt = content[..pos].trim().to_string();
            let remaining = content[pos + MORE_MARKER.len()..].trim();
            let full = format!("{}\n\n{}", excerpt, remaining);
            (Some(excerpt), full)
        } else {
            (None, content.to_string())
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
