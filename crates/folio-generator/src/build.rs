//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Utc};
use folio_core::{Config, CoreError, Page};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    assets::{AssetError, AssetProcessor},
    collector::{CollectorError, ContentCollector, SiteContent},
    html::{HtmlError, HtmlGenerator},
    robots::{RobotsError, RobotsGenerator},
    rss::{RssError, RssGenerator},
    sitemap::{SitemapError, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// RSS generation error.
    #[error("RSS error: {0}")]
    Rss(#[from] RssError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// A redirect source shadows a document.
    #[error("redirect source {source_path} collides with document {document}")]
    RouteConflict {
        source_path: String,
        document: PathBuf,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of document pages generated.
    pub pages: usize,

    /// Home and section index pages generated.
    pub indexes: usize,

    /// Number of redirect pages generated.
    pub redirects: usize,

    /// Number of assets copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            static_dir: None,
        }
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let now = Utc::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        self.config.validate()?;

        // Collect before touching the output so a broken document leaves the
        // previous build in place.
        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let content = collector.collect()?;

        self.clean_output()?;

        let generator = HtmlGenerator::new(self.config.clone());

        stats.pages = self.generate_pages(&generator, &content)?;
        stats.indexes = self.generate_indexes(&generator, &content)?;
        stats.redirects = self.generate_redirects(&generator, &content)?;

        let by_date = content.pages_by_date();

        if self.config.rss.enabled {
            self.generate_rss(&by_date, now)?;
        }

        if self.config.sitemap.enabled {
            self.generate_sitemap(&content, now)?;
        }

        RobotsGenerator::new(self.config.clone()).generate(&self.output_dir)?;

        if let Some(static_dir) = &self.static_dir {
            stats.assets = AssetProcessor::new()
                .process(static_dir, &self.output_dir)?
                .files;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            indexes = stats.indexes,
            redirects = stats.redirects,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Generate HTML pages for all documents.
    fn generate_pages(&self, generator: &HtmlGenerator, content: &SiteContent) -> Result<usize> {
        let pages: Vec<&Page> = content.pages.values().collect();

        info!(count = pages.len(), "generating HTML pages");

        // Results keep URL order, so the reported failure is stable.
        let results: Vec<Result<()>> = pages
            .par_iter()
            .map(|page| {
                let html = generator.generate_page(page)?;
                write_html(&HtmlGenerator::output_path(&page.url, &self.output_dir), &html)
            })
            .collect();

        for result in results {
            result?;
        }

        Ok(pages.len())
    }

    /// Home page plus one index per configured section.
    fn generate_indexes(&self, generator: &HtmlGenerator, content: &SiteContent) -> Result<usize> {
        let mut count = 0;

        if content.pages.contains_key("/") {
            debug!("content provides the home page");
        } else {
            let html = generator.generate_home()?;
            write_html(&HtmlGenerator::output_path("/", &self.output_dir), &html)?;
            count += 1;
        }

        for section in &self.config.sections {
            let url = format!("/{}", section.name);
            if content.pages.contains_key(&url) {
                debug!(section = %section.name, "content provides the section index");
                continue;
            }

            let pages = content.section_pages(&section.name);
            let html = generator.generate_section_index(section, &pages)?;
            write_html(&HtmlGenerator::output_path(&url, &self.output_dir), &html)?;
            count += 1;
        }

        Ok(count)
    }

    /// Meta-refresh pages for configured redirects.
    fn generate_redirects(&self, generator: &HtmlGenerator, content: &SiteContent) -> Result<usize> {
        let table = self.config.redirect_table()?;

        for redirect in table.iter() {
            let source = normalize(&redirect.source);
            if let Some(page) = content.pages.get(&source) {
                return Err(BuildError::RouteConflict {
                    source_path: redirect.source.clone(),
                    document: page.source_path.clone(),
                });
            }

            let html = generator.generate_redirect(&redirect.destination)?;
            write_html(&HtmlGenerator::output_path(&source, &self.output_dir), &html)?;

            debug!(
                source = %redirect.source,
                destination = %redirect.destination,
                "generated redirect"
            );
        }

        Ok(table.len())
    }

    /// Generate RSS feed.
    fn generate_rss(&self, pages: &[&Page], now: DateTime<Utc>) -> Result<()> {
        let xml = RssGenerator::new(self.config.clone()).generate(pages, now)?;
        let output_path = self.output_dir.join("rss.xml");
        fs::write(&output_path, xml)?;

        info!(path = %output_path.display(), "generated RSS feed");
        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, content: &SiteContent, now: DateTime<Utc>) -> Result<()> {
        let pages: Vec<&Page> = content.pages.values().collect();
        let xml = SitemapGenerator::new(self.config.clone()).generate(&pages, now)?;
        let output_path = self.output_dir.join("sitemap.xml");
        fs::write(&output_path, xml)?;

        info!(path = %output_path.display(), "generated sitemap");
        Ok(())
    }
}

fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    debug!(path = %path.display(), "wrote page");
    Ok(())
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn test_config(extra: &str) -> Config {
        Config::from_toml_str(&format!(
            "[site]\ntitle = \"Test Site\"\nbase_url = \"https://example.com\"\n\n[rss]\nenabled = true\n{extra}"
        ))
        .expect("valid config")
    }

    #[test]
    fn test_build_empty_site() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let builder = Builder::new(test_config(""), content_dir.path(), output_dir.path());
        let stats = builder.build().unwrap();

        assert_eq!(stats.pages, 0);
        // home, work, posts
        assert_eq!(stats.indexes, 3);
        assert!(output_dir.path().join("index.html").exists());
        assert!(output_dir.path().join("work/index.html").exists());
        assert!(output_dir.path().join("sitemap.xml").exists());
        assert!(output_dir.path().join("rss.xml").exists());
        assert!(output_dir.path().join("robots.txt").exists());
    }

    #[test]
    fn test_build_with_content() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        fs::create_dir_all(content_dir.path().join("posts")).unwrap();
        fs::write(
            content_dir.path().join("posts/hello.md"),
            "---\ntitle: \"Hello\"\ndate: 2026-01-14\n---\n\nHello, world!\n",
        )
        .unwrap();

        let stats = Builder::new(test_config(""), content_dir.path(), output_dir.path())
            .build()
            .unwrap();

        assert_eq!(stats.pages, 1);
        assert!(output_dir.path().join("posts/hello/index.html").exists());

        let index = fs::read_to_string(output_dir.path().join("posts/index.html")).unwrap();
        assert!(index.contains(r#"<a href="/posts/hello">Hello</a>"#));
    }

    #[test]
    fn test_redirect_pages() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let config = test_config(
            "[[redirects]]\nsource = \"/x\"\ndestination = \"https://x.com/bridgertower\"\n",
        );

        let stats = Builder::new(config, content_dir.path(), output_dir.path())
            .build()
            .unwrap();

        assert_eq!(stats.redirects, 1);
        let html = fs::read_to_string(output_dir.path().join("x/index.html")).unwrap();
        assert!(html.contains("url=https://x.com/bridgertower"));
    }

    #[test]
    fn test_redirect_colliding_with_document() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        fs::write(content_dir.path().join("site.md"), "---\ntitle: Site\n---\n").unwrap();
        let config = test_config("[[redirects]]\nsource = \"/site\"\ndestination = \"/\"\n");

        let err = Builder::new(config, content_dir.path(), output_dir.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::RouteConflict { .. }));
    }

    #[test]
    fn test_failed_collection_keeps_previous_output() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        fs::write(output_dir.path().join("keep.txt"), "old").unwrap();
        fs::write(content_dir.path().join("bad.md"), "---\ndraft: false\n---\n").unwrap();

        let result = Builder::new(test_config(""), content_dir.path(), output_dir.path()).build();

        assert!(matches!(result, Err(BuildError::Collector(_))));
        assert!(output_dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_builder_with_static_dir() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let static_dir = TempDir::new().unwrap();

        fs::write(static_dir.path().join("logo.svg"), "<svg/>").unwrap();

        let builder = Builder::new(test_config(""), content_dir.path(), output_dir.path())
            .with_static_dir(static_dir.path());

        let stats = builder.build().unwrap();

        assert_eq!(stats.assets, 1);
        assert!(output_dir.path().join("logo.svg").exists());
    }
}
