//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    content::ContentPath,
    error::{CoreError, Result},
    redirect::{Redirect, RedirectTable},
};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Home page copy.
    #[serde(default)]
    pub home: HomeConfig,

    /// Header navigation links.
    #[serde(default = "default_nav")]
    pub nav: Vec<LinkConfig>,

    /// Content sections with an index page.
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,

    /// Vanity redirects.
    #[serde(default)]
    pub redirects: Vec<Redirect>,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// RSS feed settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Theme provider settings.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Smooth scroll provider settings.
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// Analytics provider settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Toast notification settings.
    #[serde(default)]
    pub toaster: ToasterConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title used in `<title>` and feeds.
    pub title: String,

    /// Base URL for the site (e.g., "https://bridger.to").
    pub base_url: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author, also the copyright holder.
    #[serde(default)]
    pub author: Option<String>,

    /// Document language.
    #[serde(default = "default_language")]
    pub language: String,

    /// First year shown in the copyright line.
    #[serde(default)]
    pub copyright_since: Option<i32>,

    /// Logo shown in the header, relative to the static directory.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding the documents.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory copied verbatim into the output.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Language label for code blocks without one.
    #[serde(default = "default_code_language")]
    pub default_code_language: String,

    /// Whether to generate drafts.
    #[serde(default)]
    pub drafts: bool,
}

/// A link rendered in the header or on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Link text.
    pub label: String,

    /// Target URL or path.
    pub href: String,

    /// Optional lead-in text, e.g. "Follow me on".
    #[serde(default)]
    pub prefix: Option<String>,
}

impl LinkConfig {
    /// Whether the link leaves the site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

/// Home page copy, laid out on the grid by the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeConfig {
    /// Main heading, usually the author's name.
    #[serde(default)]
    pub heading: Option<String>,

    /// Role shown under the heading.
    #[serde(default)]
    pub subheading: Option<String>,

    /// Areas of focus.
    #[serde(default)]
    pub focus: Option<String>,

    /// What the author is doing right now. Inline HTML is allowed.
    #[serde(default)]
    pub current: Option<String>,

    /// Internal links (work, posts).
    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// External profiles.
    #[serde(default)]
    pub profiles: Vec<LinkConfig>,

    /// Link appended to the copyright line.
    #[serde(default)]
    pub footer_link: Option<LinkConfig>,
}

/// A content section that gets an index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Directory name under the content dir, also the URL segment.
    pub name: String,

    /// Index page title.
    pub title: String,

    /// Index page description.
    #[serde(default)]
    pub description: Option<String>,

    /// Serve documents at `/<slug>` instead of `/<name>/<slug>`.
    #[serde(default)]
    pub flatten: bool,
}

/// Sitemap change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Value written to `<changefreq>`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A configured sitemap route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntryConfig {
    /// Site-relative path, e.g. "/work".
    pub path: String,

    /// How often the route changes.
    #[serde(default = "default_change_frequency")]
    pub change_frequency: ChangeFrequency,

    /// Crawl priority in `[0, 1]`.
    #[serde(default = "default_priority")]
    pub priority: f32,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Whether sitemap.xml is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Also list every document page.
    #[serde(default = "default_true")]
    pub include_pages: bool,

    /// Static routes.
    #[serde(default = "default_sitemap_entries")]
    pub entries: Vec<SitemapEntryConfig>,
}

/// RSS feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    /// Whether RSS feed is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_rss_limit")]
    pub limit: usize,

    /// Section whose dated pages make up the feed.
    #[serde(default = "default_rss_section")]
    pub section: String,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed paths.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Disallowed paths.
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// Initial colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Name used in scripts and `localStorage`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Theme provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme applied before the visitor picks one.
    #[serde(default)]
    pub default_mode: ThemeMode,

    /// React to OS colour scheme changes.
    #[serde(default = "default_true")]
    pub enable_system: bool,

    /// Suppress CSS transitions while switching.
    #[serde(default = "default_true")]
    pub disable_transition_on_change: bool,
}

/// Smooth scroll provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Whether smooth scrolling is installed.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Animation duration in seconds.
    #[serde(default = "default_scroll_duration")]
    pub duration: f64,

    /// Multiplier for touch gestures.
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,

    /// Wrap around at the page ends.
    #[serde(default)]
    pub infinite: bool,

    /// Smooth-scroll in-page anchor links.
    #[serde(default = "default_true")]
    pub anchors: bool,
}

/// Analytics provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Whether the analytics script is injected.
    #[serde(default)]
    pub enabled: bool,

    /// Script URL.
    #[serde(default)]
    pub script_src: Option<String>,
}

/// Toast notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToasterConfig {
    /// Placement, e.g. "top-center" or "bottom-right".
    #[serde(default = "default_toaster_position")]
    pub position: String,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_syntax_theme() -> String {
    "InspiredGitHub".to_string()
}

fn default_code_language() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_nav() -> Vec<LinkConfig> {
    vec![
        LinkConfig {
            label: "Work".to_string(),
            href: "/work".to_string(),
            prefix: None,
        },
        LinkConfig {
            label: "Posts".to_string(),
            href: "/posts".to_string(),
            prefix: None,
        },
    ]
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig {
            name: "work".to_string(),
            title: "Work".to_string(),
            description: None,
            flatten: false,
        },
        SectionConfig {
            name: "posts".to_string(),
            title: "Posts".to_string(),
            description: None,
            flatten: false,
        },
    ]
}

fn default_change_frequency() -> ChangeFrequency {
    ChangeFrequency::Monthly
}

fn default_priority() -> f32 {
    0.5
}

fn default_sitemap_entries() -> Vec<SitemapEntryConfig> {
    vec![
        SitemapEntryConfig {
            path: "/".to_string(),
            change_frequency: ChangeFrequency::Monthly,
            priority: 1.0,
        },
        SitemapEntryConfig {
            path: "/work".to_string(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        },
        SitemapEntryConfig {
            path: "/posts".to_string(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.6,
        },
    ]
}

fn default_rss_limit() -> usize {
    20
}

fn default_rss_section() -> String {
    "posts".to_string()
}

fn default_scroll_duration() -> f64 {
    1.2
}

fn default_touch_multiplier() -> f64 {
    2.0
}

fn default_toaster_position() -> String {
    "top-center".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            static_dir: default_static_dir(),
            syntax_theme: default_syntax_theme(),
            default_code_language: default_code_language(),
            drafts: false,
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_pages: true,
            entries: default_sitemap_entries(),
        }
    }
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_rss_limit(),
            section: default_rss_section(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_mode: ThemeMode::System,
            enable_system: true,
            disable_transition_on_change: true,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: default_scroll_duration(),
            touch_multiplier: default_touch_multiplier(),
            infinite: false,
            anchors: true,
        }
    }
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            position: default_toaster_position(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, letting `FOLIO__SECTION__KEY` variables override the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.trim().is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        for entry in &self.sitemap.entries {
            if !entry.path.starts_with('/') {
                return Err(CoreError::config(format!(
                    "sitemap entry `{}` must start with '/'",
                    entry.path
                )));
            }
            if !(0.0..=1.0).contains(&entry.priority) {
                return Err(CoreError::config(format!(
                    "sitemap priority for `{}` must be within [0, 1], got {}",
                    entry.path, entry.priority
                )));
            }
        }

        if self.scroll.duration <= 0.0 {
            return Err(CoreError::config("scroll.duration must be positive"));
        }

        if self.analytics.enabled && self.analytics.script_src.is_none() {
            return Err(CoreError::config(
                "analytics.script_src is required when analytics is enabled",
            ));
        }

        self.redirect_table()?;
        Ok(())
    }

    /// Build the validated redirect table.
    pub fn redirect_table(&self) -> Result<RedirectTable> {
        RedirectTable::new(self.redirects.clone())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url().to_string()
        } else {
            format!("{}/{path}", self.base_url())
        }
    }

    /// Copyright holder: the author, falling back to the site title.
    #[must_use]
    pub fn copyright_holder(&self) -> &str {
        self.site.author.as_deref().unwrap_or(&self.site.title)
    }

    /// Look up a section by directory name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Apply per-section routing to a content path.
    #[must_use]
    pub fn route(&self, content_path: ContentPath) -> ContentPath {
        let flatten = content_path
            .section
            .as_deref()
            .and_then(|name| self.section(name))
            .is_some_and(|section| section.flatten);

        if flatten {
            content_path.flattened()
        } else {
            content_path
        }
    }
}
