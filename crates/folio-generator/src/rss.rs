//! RSS feed generation.
//!
//! Generates an RSS 2.0 feed for the dated pages of one section.

use chrono::{DateTime, Utc};
use folio_core::{Config, Page};
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use tracing::debug;

/// RSS generation errors.
#[derive(Debug, Error)]
pub enum RssError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for RSS operations.
pub type Result<T> = std::result::Result<T, RssError>;

/// RSS feed generator.
#[derive(Debug)]
pub struct RssGenerator {
    config: Config,
}

impl RssGenerator {
    /// Create a new RSS generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate RSS feed XML. Expects pages newest first; undated pages and
    /// pages outside the feed section are skipped.
    pub fn generate(&self, pages: &[&Page], now: DateTime<Utc>) -> Result<String> {
        let section = self.config.rss.section.as_str();
        let limit = self.config.rss.limit;

        let items: Vec<Item> = pages
            .iter()
            .filter(|p| p.section.as_deref() == Some(section) && p.meta.date.is_some())
            .take(limit)
            .map(|page| self.page_to_item(page))
            .collect();

        debug!(count = items.len(), limit, section, "generating RSS feed");

        let channel = ChannelBuilder::default()
            .title(self.config.site.title.clone())
            .link(self.config.base_url().to_string())
            .description(
                self.config
                    .site
                    .description
                    .clone()
                    .unwrap_or_else(|| self.config.site.title.clone()),
            )
            .language(Some(self.config.site.language.clone()))
            .last_build_date(Some(now.to_rfc2822()))
            .items(items)
            .build();

        Ok(channel.to_string())
    }

    /// Convert a page to an RSS item.
    fn page_to_item(&self, page: &Page) -> Item {
        let url = self.config.url_for(&page.url);

        let guid = GuidBuilder::default()
            .value(url.clone())
            .permalink(true)
            .build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(page.meta.title.clone()));
        builder.link(Some(url));
        builder.guid(Some(guid));
        builder.description(Some(page.summary.clone()));

        if let Some(date) = page.meta.date {
            builder.pub_date(Some(date.to_rfc2822()));
        }

        if let Some(author) = &self.config.site.author {
            builder.author(Some(author.clone()));
        }

        let categories: Vec<_> = page
            .meta
            .tags
            .iter()
            .map(|tag| rss::Category {
                name: tag.clone(),
                domain: None,
            })
            .collect();

        if !categories.is_empty() {
            builder.categories(categories);
        }

        builder.build()
    }
}
