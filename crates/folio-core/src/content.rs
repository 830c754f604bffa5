//! Content types and structures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::frontmatter::PageMeta;

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md, .markdown files).
    Markdown,
    /// Markdown with embedded components (.mdx files).
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Get the file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Content file path relative to the content directory, with its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Original file path.
    pub path: PathBuf,

    /// First directory component, e.g. "posts" or "work".
    pub section: Option<String>,

    /// URL slug derived from the path.
    pub slug: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl ContentPath {
    /// Parse a content path.
    ///
    /// - `posts/hello.md` → section "posts", slug "posts/hello"
    /// - `posts/hello/index.mdx` → section "posts", slug "posts/hello"
    /// - `payload-r2.mdx` → no section, slug "payload-r2"
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let content_type = ContentType::from_extension(extension)?;
        let stem = path.file_stem()?.to_str()?;

        let parent = path.parent().unwrap_or(Path::new(""));
        let parent = parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let slug = if stem == "index" {
            parent.clone()
        } else if parent.is_empty() {
            stem.to_string()
        } else {
            format!("{parent}/{stem}")
        };
        let slug = slug.trim_matches('/').to_string();

        let section = slug
            .split_once('/')
            .map(|(first, _)| first.to_string())
            .filter(|s| !s.is_empty());

        Some(Self {
            path: path.to_path_buf(),
            section,
            slug,
            content_type,
        })
    }

    /// Get the URL path for this content.
    pub fn url_path(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Drop the section segment from the slug, so `posts/mac` is served at
    /// `/mac`. The section itself is kept for listings and feeds.
    #[must_use]
    pub fn flattened(mut self) -> Self {
        if let Some(rest) = self
            .section
            .as_deref()
            .and_then(|section| self.slug.strip_prefix(section))
            .and_then(|rest| rest.strip_prefix('/'))
        {
            self.slug = rest.to_string();
        }
        self
    }
}

/// A parsed document: metadata plus rendered body.
#[derive(Debug, Clone)]
pub struct Document {
    /// Validated page metadata.
    pub meta: PageMeta,

    /// Rendered HTML body.
    pub html: String,

    /// Raw source content (without front-matter).
    pub raw: String,

    /// Table of contents extracted from headings.
    pub toc: Vec<TocEntry>,
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID for linking.
    pub id: String,
}

/// A fully processed page ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// URL path for this page.
    pub url: String,

    /// Section the page belongs to, if any.
    pub section: Option<String>,

    /// Page metadata.
    pub meta: PageMeta,

    /// Rendered HTML content.
    pub content: String,

    /// Summary for listings and feeds.
    pub summary: String,

    /// Reading time in minutes.
    pub reading_time: u32,

    /// Word count.
    pub word_count: u32,

    /// Table of contents.
    pub toc: Vec<TocEntry>,

    /// Source file path.
    pub source_path: PathBuf,
}

impl Page {
    /// Create a new page from a parsed document and its path.
    pub fn from_document(doc: Document, content_path: &ContentPath) -> Self {
        let word_count = doc.raw.split_whitespace().count() as u32;
        let reading_time = (word_count / 200).max(1);

        let summary = doc.meta.description.clone().unwrap_or_else(|| {
            let plain_text = strip_html(&doc.html);
            truncate_at_word_boundary(plain_text.trim(), 160)
        });

        Self {
            url: content_path.url_path(),
            section: content_path.section.clone(),
            meta: doc.meta,
            content: doc.html,
            summary,
            reading_time,
            word_count,
            toc: doc.toc,
            source_path: content_path.path.clone(),
        }
    }

    /// Page title.
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Publication date.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.meta.date
    }

    /// Listing order: newest first, then by weight, then by title.
    pub fn listing_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .meta
            .date
            .cmp(&self.meta.date)
            .then_with(|| self.meta.weight.cmp(&other.meta.weight))
            .then_with(|| self.meta.title.cmp(&other.meta.title))
    }
}

/// Strip HTML tags from content.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;

    use super::*;

    fn meta(title: &str) -> PageMeta {
        PageMeta {
            title: title.to_string(),
            description: None,
            date: None,
            updated: None,
            draft: false,
            tags: Vec::new(),
            weight: 0,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(
            ContentType::from_extension("MDX"),
            Some(ContentType::Mdx)
        );
        assert_eq!(ContentType::from_extension("typ"), None);
    }

    #[test]
    fn test_content_path_in_section() {
        let cp = ContentPath::from_path(Path::new("posts/hello.mdx")).expect("parse path");

        assert_eq!(cp.section.as_deref(), Some("posts"));
        assert_eq!(cp.slug, "posts/hello");
        assert_eq!(cp.content_type, ContentType::Mdx);
        assert_eq!(cp.url_path(), "/posts/hello");
    }

    #[test]
    fn test_content_path_top_level() {
        let cp = ContentPath::from_path(Path::new("payload-r2.mdx")).expect("parse path");

        assert!(cp.section.is_none());
        assert_eq!(cp.url_path(), "/payload-r2");
    }

    #[test]
    fn test_content_path_index_file() {
        let cp = ContentPath::from_path(Path::new("work/folio/index.md")).expect("parse path");

        assert_eq!(cp.slug, "work/folio");
        assert_eq!(cp.section.as_deref(), Some("work"));
    }

    #[test]
    fn test_content_path_flattened() {
        let cp = ContentPath::from_path(Path::new("posts/mac.md"))
            .expect("parse path")
            .flattened();

        assert_eq!(cp.url_path(), "/mac");
        assert_eq!(cp.section.as_deref(), Some("posts"));

        let index = ContentPath::from_path(Path::new("posts/index.md"))
            .expect("parse path")
            .flattened();
        assert_eq!(index.url_path(), "/posts");
    }

    #[test]
    fn test_content_path_rejects_other_extensions() {
        assert!(ContentPath::from_path(Path::new("posts/notes.txt")).is_none());
    }

    #[test]
    fn test_page_from_document() {
        let cp = ContentPath::from_path(Path::new("posts/mac.md")).expect("parse path");
        let doc = Document {
            meta: meta("Mac setup"),
            html: "<p>Install <code>brew</code> first.</p>".to_string(),
            raw: "Install `brew` first.".to_string(),
            toc: Vec::new(),
        };

        let page = Page::from_document(doc, &cp);
        assert_eq!(page.url, "/posts/mac");
        assert_eq!(page.title(), "Mac setup");
        assert_eq!(page.summary, "Install brew first.");
        assert_eq!(page.word_count, 3);
        assert_eq!(page.reading_time, 1);
    }

    #[test]
    fn test_listing_order_newest_first() {
        let cp = ContentPath::from_path(Path::new("posts/a.md")).expect("parse path");
        let mut older = meta("Older");
        older.date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
        let mut newer = meta("Newer");
        newer.date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single();

        let doc = |meta| Document {
            meta,
            html: String::new(),
            raw: String::new(),
            toc: Vec::new(),
        };
        let mut pages = vec![
            Page::from_document(doc(older), &cp),
            Page::from_document(doc(newer), &cp),
        ];
        pages.sort_by(Page::listing_cmp);

        assert_eq!(pages[0].title(), "Newer");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>World</strong></p>"),
            "Hello World"
        );
        assert_eq!(strip_html("No tags here"), "No tags here");
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let text = "Hello world this is a test";
        assert_eq!(truncate_at_word_boundary(text, 100), text);
        assert_eq!(truncate_at_word_boundary(text, 11), "Hello...");
        assert_eq!(truncate_at_word_boundary(text, 12), "Hello world...");

        let emoji_text = "Hello 🌟 World 📝 Test";
        assert_eq!(truncate_at_word_boundary(emoji_text, 10), "Hello 🌟...");
    }
}
