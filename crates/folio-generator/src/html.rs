//! HTML generation from parsed content.
//!
//! Every page is a [`Grid`] wrapped in the base template. Document pages use
//! the markdown layout: the `Meta` rows, the post body, a spacer row and the
//! copyright row.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use folio_core::{
    Config, Page,
    config::{LinkConfig, SectionConfig},
};
use folio_ui::{Child, Grid, Meta, PostWrapper, Providers, Row, Span};
use thiserror::Error;
use tracing::debug;

use crate::template::{Template, TemplateContext, TemplateError, TemplateRegistry};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Which layout a page body is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Home,
    Markdown,
}

impl Layout {
    fn class(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Markdown => "markdown",
        }
    }
}

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    providers: Providers,
    config: Config,
    year: i32,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_templates(config, TemplateRegistry::new())
    }

    /// Create a generator with custom templates.
    #[must_use]
    pub fn with_templates(config: Config, templates: TemplateRegistry) -> Self {
        Self {
            templates,
            providers: Providers::from_config(&config),
            config,
            year: Utc::now().year(),
        }
    }

    /// Pin the year used in copyright lines.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Register a custom template.
    pub fn register_template(&mut self, template: Template) {
        self.templates.register(template);
    }

    /// Generate HTML for a document page.
    pub fn generate_page(&self, page: &Page) -> Result<String> {
        debug!(url = %page.url, "generating HTML for page");

        let grid = Grid::new()
            .rows(Meta::from_page(&page.meta).rows())
            .row(PostWrapper::row(&page.content));

        let description = page
            .meta
            .description
            .as_deref()
            .or(self.config.site.description.as_deref());

        self.render_shell(
            &self.document_title(page.title()),
            description,
            &page.url,
            Layout::Markdown,
            self.markdown_layout(grid),
        )
    }

    /// Generate the home page from `[home]` configuration.
    pub fn generate_home(&self) -> Result<String> {
        debug!("generating home page");

        let home = &self.config.home;
        let heading = home.heading.as_deref().unwrap_or(&self.config.site.title);

        let mut intro = format!("<h1>{}</h1>", escape(heading));
        if let Some(subheading) = &home.subheading {
            intro.push_str(&format!(
                r#"<h2 class="text-muted">{}</h2>"#,
                escape(subheading)
            ));
        }

        let focus = home
            .focus
            .as_ref()
            .map(|f| format!("<h3>{}</h3>", escape(f)))
            .unwrap_or_default();
        // `current` is trusted inline HTML from the site owner.
        let current = home
            .current
            .as_ref()
            .map(|c| format!("<h4>{c}</h4>"))
            .unwrap_or_default();

        let links: String = home.links.iter().map(link_paragraph).collect();
        let profiles: String = home.profiles.iter().map(link_paragraph).collect();

        let mut copyright = format!("<p>{}", self.copyright_line(true));
        if let Some(link) = &home.footer_link {
            copyright.push_str(&format!(", {}", anchor(link)));
        }
        copyright.push_str("</p>");

        let grid = Grid::new()
            .row(Row::from_cells([
                Child::new(intro).span(Span::Two),
                Child::empty(),
                Child::empty(),
            ]))
            .row(Row::from_cells([
                Child::new(focus).span(Span::Two),
                Child::new(current).span(Span::Two),
            ]))
            .row(Row::empty())
            .row(Row::from_cells([
                Child::new(links).span(Span::Two),
                Child::new(profiles).span(Span::Two),
            ]))
            .row(Row::from_cells([
                Child::new(copyright).span(Span::Three).class("text-muted"),
                Child::empty(),
            ]));

        let title = match &home.subheading {
            Some(sub) => format!("{} / {sub}", self.config.site.title),
            None => self.config.site.title.clone(),
        };

        self.render_shell(
            &title,
            self.config.site.description.as_deref(),
            "/",
            Layout::Home,
            grid,
        )
    }

    /// Generate a section index listing `pages` in the given order.
    pub fn generate_section_index(&self, section: &SectionConfig, pages: &[&Page]) -> Result<String> {
        debug!(section = %section.name, count = pages.len(), "generating section index");

        let items: String = pages
            .iter()
            .map(|page| {
                let date = page
                    .date()
                    .map(|d| {
                        format!(
                            r#"<time datetime="{}">{}</time>"#,
                            d.format("%Y-%m-%d"),
                            d.format("%B %-d, %Y")
                        )
                    })
                    .unwrap_or_default();
                format!(
                    r#"<li><a href="{}">{}</a>{date}</li>"#,
                    escape_attr(&page.url),
                    escape(page.title())
                )
            })
            .collect();

        let listing = if items.is_empty() {
            r#"<p class="text-muted">Nothing here yet.</p>"#.to_string()
        } else {
            format!(r#"<ul class="listing">{items}</ul>"#)
        };

        let grid = Grid::new()
            .rows(Meta::new(&section.title, section.description.as_deref()).rows())
            .row(Row::from_cells([Child::new(listing).span(Span::Four)]));

        self.render_shell(
            &self.document_title(&section.title),
            section.description.as_deref(),
            &format!("/{}", section.name),
            Layout::Markdown,
            self.markdown_layout(grid),
        )
    }

    /// Generate redirect HTML for a vanity path.
    pub fn generate_redirect(&self, redirect_url: &str) -> Result<String> {
        let ctx = TemplateContext::new().with_var("redirect_url", escape_attr(redirect_url));
        self.templates
            .render("redirect", &ctx)
            .map_err(HtmlError::from)
    }

    /// Get the output path for a URL path.
    #[must_use]
    pub fn output_path(url: &str, output_dir: &Path) -> PathBuf {
        let relative = url.trim_matches('/');

        if relative.is_empty() {
            output_dir.join("index.html")
        } else {
            output_dir.join(relative).join("index.html")
        }
    }

    /// Spacer row plus copyright row shared by markdown pages.
    fn markdown_layout(&self, grid: Grid) -> Grid {
        grid.row(Row::empty()).row(Row::from_cells([
            Child::new(format!("<p>{}</p>", self.copyright_line(false)))
                .span(Span::Three)
                .class("text-muted"),
            Child::empty(),
        ]))
    }

    /// `© holder, 2025` or, with `ongoing`, `© holder, 2025-Present`.
    fn copyright_line(&self, ongoing: bool) -> String {
        let holder = escape(self.config.copyright_holder());
        let since = self.config.site.copyright_since.unwrap_or(self.year);
        if ongoing {
            format!("&copy; {holder}, {since}-Present")
        } else {
            format!("&copy; {holder}, {since}")
        }
    }

    fn document_title(&self, title: &str) -> String {
        format!("{title} / {}", self.config.site.title)
    }

    fn header(&self) -> String {
        let site = &self.config.site;
        let mark = match &site.logo {
            Some(logo) => format!(
                r#"<img src="{}" alt="{} logo">"#,
                escape_attr(logo),
                escape_attr(&site.title)
            ),
            None => escape(&site.title),
        };
        let label = match &site.description {
            Some(desc) => format!("{} / {}", site.title, desc),
            None => site.title.clone(),
        };
        let nav = self
            .config
            .nav
            .iter()
            .map(anchor)
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"<header class="section site-header"><div class="container"><a href="/" class="logo">{mark}<span class="sr-only">{}</span></a><nav>{nav}</nav></div></header>"#,
            escape(&label)
        )
    }

    fn render_shell(
        &self,
        title: &str,
        description: Option<&str>,
        path: &str,
        layout: Layout,
        grid: Grid,
    ) -> Result<String> {
        let content = format!(
            r#"<main class="{}"><section class="section"><div class="container">{}</div></section></main>"#,
            layout.class(),
            grid.render()
        );

        let mut ctx = TemplateContext::new()
            .with_var("lang", escape_attr(&self.config.site.language))
            .with_var("title", escape(title))
            .with_var("site_title", escape_attr(&self.config.site.title))
            .with_var("canonical_url", escape_attr(&self.config.url_for(path)))
            .with_var("header", self.header())
            .with_var("content", content)
            .with_var("theme_toggle", self.providers.theme.toggle_button())
            .with_var("provider_head", self.providers.head())
            .with_var("provider_body", self.providers.body());

        if let Some(desc) = description {
            ctx.insert("description", escape_attr(desc));
        }
        if let Some(author) = &self.config.site.author {
            ctx.insert("author", escape_attr(author));
        }

        Ok(self.templates.render("base", &ctx)?)
    }
}

/// `<p>+ <a href="/work">View my work</a></p>`
fn link_paragraph(link: &LinkConfig) -> String {
    match &link.prefix {
        Some(prefix) => format!("<p>{} {}</p>", escape(prefix), anchor(link)),
        None => format!("<p>{}</p>", anchor(link)),
    }
}

fn anchor(link: &LinkConfig) -> String {
    let target = if link.is_external() {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}"{target}>{}</a>"#,
        escape_attr(&link.href),
        escape(&link.label)
    )
}

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}
