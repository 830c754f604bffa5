//! Folio Generator Library
//!
//! Turns a content directory into a static site.
//!
//! # Modules
//!
//! - [`collector`] - Content collection and organization
//! - [`template`] - Page shell templates with variable interpolation
//! - [`html`] - Grid layouts for documents, home and section indexes
//! - [`rss`] - RSS feed generation
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`assets`] - Static asset copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod html;
pub mod robots;
pub mod rss;
pub mod sitemap;
pub mod template;

pub use assets::{AssetProcessor, AssetStats};
pub use build::{BuildError, BuildStats, Builder};
pub use collector::{ContentCollector, SiteContent};
pub use html::HtmlGenerator;
pub use robots::RobotsGenerator;
pub use rss::RssGenerator;
pub use sitemap::SitemapGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
