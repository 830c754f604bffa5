//! Sitemap generation.
//!
//! Routes come from `[[sitemap.entries]]`, stamped with the build time.
//! Document pages can be appended with a fixed monthly frequency.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use folio_core::{
    Config, Page,
    config::{ChangeFrequency, SitemapEntryConfig},
};
use thiserror::Error;
use tracing::debug;

/// Priority given to document pages.
pub const PAGE_PRIORITY: f32 = 0.5;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Priority outside `[0, 1]`.
    #[error("priority {priority} for {url} is outside [0, 1]")]
    InvalidPriority { url: String, priority: f32 },
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub url: String,

    /// Last modification time.
    pub last_modified: DateTime<Utc>,

    /// Change frequency.
    pub change_frequency: ChangeFrequency,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

impl SitemapEntry {
    fn to_xml(&self) -> String {
        format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&self.url),
            self.last_modified.format("%Y-%m-%d"),
            self.change_frequency.as_str(),
            self.priority
        )
    }
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Entries for configured routes, then for pages not already listed.
    pub fn entries(&self, pages: &[&Page], now: DateTime<Utc>) -> Result<Vec<SitemapEntry>> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for route in &self.config.sitemap.entries {
            let entry = self.route_entry(route, now)?;
            seen.insert(normalize(&route.path));
            entries.push(entry);
        }

        if self.config.sitemap.include_pages {
            for page in pages {
                if !seen.insert(normalize(&page.url)) {
                    continue;
                }
                entries.push(SitemapEntry {
                    url: self.config.url_for(&page.url),
                    last_modified: page.meta.last_modified().unwrap_or(now),
                    change_frequency: ChangeFrequency::Monthly,
                    priority: PAGE_PRIORITY,
                });
            }
        }

        Ok(entries)
    }

    fn route_entry(&self, route: &SitemapEntryConfig, now: DateTime<Utc>) -> Result<SitemapEntry> {
        let url = self.config.url_for(&route.path);
        if !(0.0..=1.0).contains(&route.priority) {
            return Err(SitemapError::InvalidPriority {
                url,
                priority: route.priority,
            });
        }

        Ok(SitemapEntry {
            url,
            last_modified: now,
            change_frequency: route.change_frequency,
            priority: route.priority,
        })
    }

    /// Generate sitemap XML.
    pub fn generate(&self, pages: &[&Page], now: DateTime<Utc>) -> Result<String> {
        let entries = self.entries(pages, now)?;
        debug!(count = entries.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in &entries {
            xml.push_str(&entry.to_xml());
        }

        xml.push_str("</urlset>\n");
        Ok(xml)
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
