//! Markdown and MDX rendering using pulldown-cmark.
//!
//! Headings get unique ids with anchor links and fenced code is rendered
//! through [`CodeBlock`]. Everything else goes through pulldown-cmark's own
//! HTML writer.

use std::{collections::HashSet, path::Path};

use folio_core::{
    content::{Document, TocEntry},
    frontmatter::parse_meta,
};
use folio_ui::components::{CodeBlock, DEFAULT_LANGUAGE};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use thiserror::Error;
use tracing::debug;

use crate::syntax::{DEFAULT_THEME, SyntaxHighlighter};

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Missing or malformed metadata block.
    #[error(transparent)]
    Frontmatter(#[from] folio_core::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
    default_language: String,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_THEME, DEFAULT_LANGUAGE)
    }

    /// Create a parser with a syntax theme and a fallback code language.
    pub fn with_settings(theme: &str, default_language: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::new(theme),
            options,
            default_language: default_language.to_string(),
        }
    }

    /// Parse a Markdown document with its metadata block.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Document> {
        let (meta, body) = parse_meta(content, path)?;
        let (html, toc) = self.render_markdown(&body);

        Ok(Document {
            meta,
            html,
            raw: body,
            toc,
        })
    }

    /// Parse an MDX document. ESM statements and `{/* */}` comments are
    /// removed; component tags pass through as raw HTML.
    pub fn parse_mdx(&self, content: &str, path: &Path) -> Result<Document> {
        let (meta, body) = parse_meta(content, path)?;
        let body = strip_mdx_syntax(&body);
        let (html, toc) = self.render_markdown(&body);

        Ok(Document {
            meta,
            html,
            raw: body,
            toc,
        })
    }

    /// Parse markdown without frontmatter (body only).
    pub fn parse_body(&self, body: &str) -> (String, Vec<TocEntry>) {
        self.render_markdown(body)
    }

    /// Render markdown to HTML with TOC extraction.
    fn render_markdown(&self, content: &str) -> (String, Vec<TocEntry>) {
        let mut toc = Vec::new();
        let mut ids = HeadingIds::default();
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut heading: Option<OpenHeading<'_>> = None;
        let mut code: Option<(String, String)> = None;

        for event in Parser::new_ext(content, self.options) {
            if code.is_some() {
                match event {
                    Event::Text(text) => {
                        if let Some((_, buf)) = code.as_mut() {
                            buf.push_str(&text);
                        }
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, buf)) = code.take() {
                            events.push(Event::Html(self.render_code(&buf, &lang).into()));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if heading.is_some() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        if let Some(open) = heading.take() {
                            let rendered = open.finish(&mut ids, &mut toc);
                            events.push(Event::Html(rendered.into()));
                        }
                    }
                    event => {
                        if let Some(open) = heading.as_mut() {
                            if let Event::Text(text) | Event::Code(text) = &event {
                                open.text.push_str(text);
                            }
                            open.inner.push(event);
                        }
                    }
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(OpenHeading {
                        level,
                        id: id.map(|i| i.to_string()),
                        text: String::new(),
                        inner: Vec::new(),
                    });
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info).to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(content.len() * 2);
        html::push_html(&mut out, events.into_iter());
        (out, toc)
    }

    fn render_code(&self, source: &str, lang: &str) -> String {
        let lang = if lang.is_empty() {
            self.default_language.as_str()
        } else {
            lang
        };
        let block = CodeBlock::new(source, lang);
        let lines = self
            .highlighter
            .highlight_lines(block.code(), block.language());
        debug!(lang = block.language(), lines = lines.len(), "rendered code block");
        block.render(&lines)
    }
}

/// Heading collected between its start and end events.
struct OpenHeading<'a> {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
    inner: Vec<Event<'a>>,
}

impl OpenHeading<'_> {
    fn finish(self, ids: &mut HeadingIds, toc: &mut Vec<TocEntry>) -> String {
        let level = self.level as u8;
        let base = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| slugify(&self.text));
        let id = ids.unique(if base.is_empty() {
            "section".to_string()
        } else {
            base
        });

        let mut inner = String::new();
        html::push_html(&mut inner, self.inner.into_iter());

        toc.push(TocEntry {
            level,
            text: self.text.trim().to_string(),
            id: id.clone(),
        });

        let id = html_escape::encode_double_quoted_attribute(&id);
        format!(
            r##"<h{level} id="{id}">{inner}<a class="heading-anchor" href="#{id}" aria-hidden="true" tabindex="-1">#</a></h{level}>
"##
        )
    }
}

/// Hands out heading ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
struct HeadingIds {
    seen: HashSet<String>,
}

impl HeadingIds {
    fn unique(&mut self, base: String) -> String {
        if self.seen.insert(base.clone()) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.seen.insert(candidate.clone()))
            .unwrap_or(base)
    }
}

/// Language token of a fence info string, e.g. `ts` in "ts title=app.ts".
fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("")
        .trim()
}

/// Remove MDX-only syntax that has no meaning in static HTML.
///
/// A top-level line starting with `import ` or `export ` opens an ESM
/// statement that ends once its brackets balance. `{/* */}` comments may span
/// lines. Fenced code is left untouched.
fn strip_mdx_syntax(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<Fence> = None;
    let mut esm_depth: Option<i32> = None;
    let mut in_comment = false;

    for line in body.split_inclusive('\n') {
        if let Some(open) = fence {
            if open.is_closed_by(line) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }

        if let Some(depth) = esm_depth {
            let depth = depth + bracket_delta(line);
            esm_depth = esm_continues(line, depth).then_some(depth);
            continue;
        }

        if !in_comment {
            if let Some(open) = Fence::open(line) {
                fence = Some(open);
                out.push_str(line);
                continue;
            }

            if line.starts_with("import ") || line.starts_with("export ") {
                let depth = bracket_delta(line);
                esm_depth = esm_continues(line, depth).then_some(depth);
                continue;
            }
        }

        let (kept, touched) = strip_jsx_comments(line, &mut in_comment);
        if touched && kept.trim().is_empty() {
            continue;
        }
        out.push_str(&kept);
    }

    out
}

/// An open code fence: marker character and run length.
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    /// A closing fence is a run of the same marker at least as long as the
    /// opening one, followed only by whitespace.
    fn is_closed_by(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let len = trimmed.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && trimmed[len * self.marker.len_utf8()..].trim().is_empty()
    }
}

/// Net count of opening minus closing brackets outside string literals.
fn bracket_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' | '(' | '[' => delta += 1,
            '}' | ')' | ']' => delta -= 1,
            _ => {}
        }
    }

    delta
}

/// Whether an ESM statement carries on past `line`.
fn esm_continues(line: &str, depth: i32) -> bool {
    depth > 0 || line.trim_end().ends_with(['=', ','])
}

/// Strip `{/* */}` comments from one line. `in_comment` carries an open
/// comment over to the next line. Returns the kept text and whether any
/// comment text was removed.
fn strip_jsx_comments(line: &str, in_comment: &mut bool) -> (String, bool) {
    let mut rest = line;
    let mut out = String::with_capacity(line.len());
    let mut touched = false;

    loop {
        if *in_comment {
            touched = true;
            match rest.find("*/}") {
                Some(end) => {
                    rest = &rest[end + 3..];
                    *in_comment = false;
                }
                None => {
                    if line.ends_with('\n') {
                        out.push('\n');
                    }
                    return (out, touched);
                }
            }
        }

        match rest.find("{/*") {
            Some(start) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + 3..];
                *in_comment = true;
            }
            None => {
                out.push_str(rest);
                return (out, touched);
            }
        }
    }
}

/// Convert text to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
