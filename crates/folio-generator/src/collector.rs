//! Content collection and organization.
//!
//! Walks the content directory and parses every document. Files are visited in
//! sorted path order and the first failing document aborts collection, so the
//! same broken tree always reports the same error.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Config, ContentPath, Page, content::ContentType};
use folio_parser::ParserRegistry;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parser error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),

    /// Two documents map to the same URL.
    #[error("{url} is produced by both {first} and {second}")]
    DuplicateUrl {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// All pages indexed by URL.
    pub pages: BTreeMap<String, Page>,

    /// Page URLs organized by section (first path component).
    pub sections: HashMap<String, Vec<String>>,
}

impl SiteContent {
    /// Pages of a section, newest first.
    pub fn section_pages(&self, section: &str) -> Vec<&Page> {
        let mut pages: Vec<_> = self
            .sections
            .get(section)
            .map(|urls| urls.iter().filter_map(|u| self.pages.get(u)).collect())
            .unwrap_or_default();
        pages.sort_by(|a, b| a.listing_cmp(b));
        pages
    }

    /// Every page, newest first.
    pub fn pages_by_date(&self) -> Vec<&Page> {
        let mut pages: Vec<_> = self.pages.values().collect();
        pages.sort_by(|a, b| a.listing_cmp(b));
        pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages were collected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        let parser = ParserRegistry::from_build_config(&config.build);
        Self {
            config,
            parser,
            content_dir: content_dir.into(),
        }
    }

    /// Collect all content from the content directory.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        // Parse in parallel; results keep the sorted file order.
        let parsed: Vec<Result<Page>> = files.par_iter().map(|p| self.parse_file(p)).collect();

        let mut content = SiteContent::default();

        for result in parsed {
            let page = result?;

            if page.meta.draft && !self.config.build.drafts {
                debug!(url = %page.url, "skipping draft");
                continue;
            }

            if let Some(existing) = content.pages.get(&page.url) {
                return Err(CollectorError::DuplicateUrl {
                    url: page.url.clone(),
                    first: existing.source_path.clone(),
                    second: page.source_path.clone(),
                });
            }

            if let Some(section) = &page.section {
                content
                    .sections
                    .entry(section.clone())
                    .or_default()
                    .push(page.url.clone());
            }

            content.pages.insert(page.url.clone(), page);
        }

        info!(
            pages = content.pages.len(),
            sections = content.sections.len(),
            "content collection complete"
        );

        Ok(content)
    }

    /// Find all content files recursively, sorted by path.
    pub fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        walk_dir(&self.content_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Parse a single content file into a Page.
    pub fn parse_file(&self, path: &Path) -> Result<Page> {
        debug!(path = %path.display(), "parsing file");

        let content = fs::read_to_string(path)?;

        let relative_path = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let content_path = ContentPath::from_path(relative_path)
            .map(|cp| self.config.route(cp))
            .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

        let doc = self
            .parser
            .parse(&content, path)
            .map_err(|e| CollectorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Page::from_document(doc, &content_path))
    }
}

/// Recursively walk a directory for content files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Skip hidden files and directories
        if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.is_file()
            && let Some(ext) = path.extension()
            && ContentType::from_extension(&ext.to_string_lossy()).is_some()
        {
            files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(drafts: bool) -> Config {
        let mut config = Config::from_toml_str(
            "[site]\ntitle = \"Test Site\"\nbase_url = \"https://example.com\"",
        )
        .expect("valid config");
        config.build.drafts = drafts;
        config
    }

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, body).expect("write file");
    }

    #[test]
    fn test_collect_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nA");
        write(dir.path(), "posts/b.mdx", "---\ntitle: B\ndate: 2025-01-01\n---\nB");
        write(dir.path(), "work/folio.md", "---\ntitle: Folio\n---\nW");
        write(dir.path(), "mac.md", "---\ntitle: Mac\n---\nM");
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), ".hidden/x.md", "---\ntitle: X\n---\n");

        let content = ContentCollector::new(test_config(false), dir.path())
            .collect()
            .expect("collect");

        assert_eq!(content.len(), 4);
        let posts: Vec<_> = content
            .section_pages("posts")
            .iter()
            .map(|p| p.title().to_string())
            .collect();
        assert_eq!(posts, vec!["B", "A"]);
        assert_eq!(content.section_pages("work").len(), 1);
        assert!(content.pages.contains_key("/mac"));
    }

    #[test]
    fn test_missing_title_fails_whole_collection() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/good.md", "---\ntitle: Good\n---\nok");
        write(dir.path(), "posts/bad.md", "---\ndescription: nope\n---\nbad");

        let collector = ContentCollector::new(test_config(false), dir.path());
        let first = collector.collect().unwrap_err().to_string();
        let second = collector.collect().unwrap_err().to_string();

        assert!(first.contains("bad.md"));
        assert!(first.contains("title is required"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_error_in_path_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "a.md", "no metadata");
        write(dir.path(), "z.md", "no metadata either");

        let err = ContentCollector::new(test_config(false), dir.path())
            .collect()
            .unwrap_err();
        assert!(err.to_string().contains("a.md"));
    }

    #[test]
    fn test_drafts_skipped_unless_enabled() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/wip.md", "---\ntitle: WIP\ndraft: true\n---\n");

        let skipped = ContentCollector::new(test_config(false), dir.path())
            .collect()
            .expect("collect");
        assert!(skipped.is_empty());

        let included = ContentCollector::new(test_config(true), dir.path())
            .collect()
            .expect("collect");
        assert_eq!(included.len(), 1);
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/x.md", "---\ntitle: One\n---\n");
        write(dir.path(), "posts/x/index.md", "---\ntitle: Two\n---\n");

        let err = ContentCollector::new(test_config(false), dir.path())
            .collect()
            .unwrap_err();
        assert!(matches!(err, CollectorError::DuplicateUrl { .. }));
    }

    #[test]
    fn test_flattened_section_keeps_listing() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/mac.md", "---\ntitle: Mac\n---\n");
        let mut config = test_config(false);
        if let Some(posts) = config.sections.iter_mut().find(|s| s.name == "posts") {
            posts.flatten = true;
        }

        let content = ContentCollector::new(config, dir.path())
            .collect()
            .expect("collect");

        assert!(content.pages.contains_key("/mac"));
        assert_eq!(content.section_pages("posts").len(), 1);
    }

    #[test]
    fn test_flattened_collision_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "posts/site.md", "---\ntitle: Post\n---\n");
        write(dir.path(), "site.md", "---\ntitle: Site\n---\n");
        let mut config = test_config(false);
        if let Some(posts) = config.sections.iter_mut().find(|s| s.name == "posts") {
            posts.flatten = true;
        }

        let err = ContentCollector::new(config, dir.path())
            .collect()
            .unwrap_err();
        assert!(matches!(err, CollectorError::DuplicateUrl { .. }));
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let content = ContentCollector::new(test_config(false), "/nonexistent/content")
            .collect()
            .expect("collect");
        assert!(content.is_empty());
    }
}
