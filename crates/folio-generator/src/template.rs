//! Page shell templates.
//!
//! `{{ name }}` placeholders are replaced from a [`TemplateContext`];
//! `{{ name? }}` renders as empty when the variable is missing. Inserted values
//! are never re-scanned, so page bodies may contain `{{` freely.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

/// A named template string.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();

            let (var_name, optional) = if let Some(stripped) = var_name.strip_suffix('?') {
                (stripped, true)
            } else {
                (var_name, false)
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a registry holding the built-in `base` and `redirect` templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    /// Register default built-in templates.
    fn register_defaults(&mut self) {
        self.register(Template::new("base", BASE_TEMPLATE));
        self.register(Template::new("redirect", REDIRECT_TEMPLATE));
    }

    /// Register a template, replacing any with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Document shell shared by every page.
///
/// Grid borders are drawn by the cells themselves: rows add horizontal rules,
/// children add vertical ones, so adjacent cells share a single line.
pub const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <meta name="description" content="{{ description? }}">
    <meta name="author" content="{{ author? }}">
    <link rel="canonical" href="{{ canonical_url }}">
    <link rel="alternate" type="application/rss+xml" title="{{ site_title }}" href="/rss.xml">
    <style>
        :root {
            --background: #ffffff;
            --foreground: #0a0a0a;
            --muted: #e5e5e5;
            --muted-foreground: #737373;
            --code-background: #fafafa;
            color-scheme: light;
        }

        :root.dark {
            --background: #0a0a0a;
            --foreground: #fafafa;
            --muted: rgba(38, 38, 38, 0.5);
            --muted-foreground: #a3a3a3;
            --code-background: #111111;
            color-scheme: dark;
        }

        *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            min-height: 100vh;
            width: 100vw;
            overflow-x: hidden;
            font-family: "Inter", system-ui, -apple-system, sans-serif;
            background: var(--background);
            color: var(--foreground);
            -webkit-font-smoothing: antialiased;
        }

        a { color: inherit; text-decoration: underline; text-underline-offset: 2px; }
        a:hover { color: var(--muted-foreground); }

        .section { padding: 1.5rem 1rem; }
        .container { max-width: 80rem; margin: 0 auto; }

        .site-header .container {
            display: flex;
            align-items: center;
            justify-content: space-between;
            gap: 1rem;
            font-size: 1.25rem;
        }
        .site-header .logo { text-decoration: none; font-weight: 600; }
        .site-header .logo img { height: 29px; width: auto; }
        .site-header nav a { margin-left: 0.75rem; text-decoration: none; }

        main { letter-spacing: -0.025em; line-height: 1.25; }
        main.home { font-size: 1.125rem; }
        main.markdown { font-size: 1.25rem; }

        .grid { display: grid; gap: 1rem; box-shadow: inset 0 0 0 1px var(--muted); }
        .row {
            display: grid;
            grid-template-columns: repeat(1, minmax(0, 1fr));
            gap: 1rem;
            border-top: 1px solid var(--muted);
            border-bottom: 1px solid var(--muted);
        }
        .child { border-left: 1px solid var(--muted); border-right: 1px solid var(--muted); }
        .child > * + * { margin-top: 0.5rem; }
        .text-muted { color: var(--muted-foreground); }
        .mobile-only { display: block; }
        .row.mobile-only { display: grid; }
        .desktop-only { display: none; }

        @media (min-width: 640px) {
            .section { padding: 2rem 1.5rem; }
            .child { min-height: 8rem; }
        }

        @media (min-width: 1024px) {
            .row { grid-template-columns: repeat(4, minmax(0, 1fr)); }
            .col-span-1 { grid-column: span 1 / span 1; }
            .col-span-2 { grid-column: span 2 / span 2; }
            .col-span-3 { grid-column: span 3 / span 3; }
            .col-span-4 { grid-column: span 4 / span 4; }
            .mobile-only, .row.mobile-only { display: none; }
            .desktop-only { display: block; }
        }

        .title { font-size: inherit; font-weight: 500; }
        .description { color: var(--muted-foreground); }

        .prose { max-width: 48rem; padding: 1rem 0; font-size: 1rem; line-height: 1.7; }
        .prose > * + * { margin-top: 1.25rem; }
        .prose h2, .prose h3, .prose h4 { margin-top: 2rem; font-weight: 500; }
        .prose ul, .prose ol { padding-left: 1.5rem; }
        .prose img { max-width: 100%; height: auto; }
        .prose blockquote { border-left: 2px solid var(--muted); padding-left: 1rem; color: var(--muted-foreground); }
        .prose :not(pre) > code { font-size: 0.875em; background: var(--code-background); padding: 0.1rem 0.3rem; border-radius: 0.25rem; }

        .heading-anchor { margin-left: 0.5rem; text-decoration: none; opacity: 0; color: var(--muted-foreground); }
        h2:hover .heading-anchor, h3:hover .heading-anchor, h4:hover .heading-anchor { opacity: 1; }

        .listing { list-style: none; padding: 0; }
        .listing li { display: flex; justify-content: space-between; gap: 1rem; padding: 0.5rem 0; }
        .listing time { color: var(--muted-foreground); font-variant-numeric: tabular-nums; }

        .code-block {
            position: relative;
            border: 1px solid var(--muted);
            border-radius: 0.375rem;
            background: var(--code-background);
            overflow: hidden;
            font-size: 0.875rem;
        }
        .code-block figcaption {
            display: flex;
            align-items: center;
            justify-content: space-between;
            padding: 0.25rem 0.75rem;
            border-bottom: 1px solid var(--muted);
            color: var(--muted-foreground);
        }
        .code-block .code-scroll { overflow-x: auto; }
        .code-block table { border-collapse: collapse; width: 100%; }
        .code-block td { padding: 0 0.75rem; white-space: pre; vertical-align: top; }
        .code-block code { font-family: ui-monospace, "SF Mono", Menlo, Consolas, monospace; }
        .code-block .line-number {
            width: 1%;
            text-align: right;
            color: var(--muted-foreground);
            user-select: none;
        }
        .copy-button {
            border: 0;
            background: none;
            color: inherit;
            cursor: pointer;
            font: inherit;
        }
        .copy-button[data-state="copied"] { color: #16a34a; }
        .copy-button .copied { display: none; }
        .copy-button[data-state="copied"] .copied { display: inline; }
        .copy-button[data-state="copied"] .idle { display: none; }

        .theme-toggle-wrapper { position: fixed; bottom: 1rem; right: 1rem; }
        @media (min-width: 640px) { .theme-toggle-wrapper { bottom: 1.5rem; right: 1.5rem; } }
        .theme-toggle {
            width: 2.25rem;
            height: 2.25rem;
            border: 1px solid var(--muted);
            border-radius: 0.375rem;
            background: var(--background);
            color: var(--foreground);
            cursor: pointer;
        }
        .theme-toggle .sun { display: none; }
        :root.dark .theme-toggle .sun { display: inline; }
        :root.dark .theme-toggle .moon { display: none; }

        .toaster {
            position: fixed;
            z-index: 100;
            display: flex;
            flex-direction: column;
            gap: 0.5rem;
            pointer-events: none;
        }
        .toaster[data-position^="top"] { top: 1rem; }
        .toaster[data-position^="bottom"] { bottom: 1rem; }
        .toaster[data-position$="center"] { left: 50%; transform: translateX(-50%); }
        .toaster[data-position$="left"] { left: 1rem; }
        .toaster[data-position$="right"] { right: 1rem; }
        .toast {
            padding: 0.75rem 1rem;
            border: 1px solid var(--muted);
            border-radius: 0.5rem;
            background: var(--background);
            font-size: 0.875rem;
            box-shadow: 0 4px 12px rgba(0, 0, 0, 0.08);
        }
        .toast[data-kind="error"] { color: #dc2626; }

        .sr-only {
            position: absolute;
            width: 1px;
            height: 1px;
            overflow: hidden;
            clip: rect(0, 0, 0, 0);
            white-space: nowrap;
        }

        @media (prefers-reduced-motion: reduce) {
            *, *::before, *::after { transition-duration: 0.01ms !important; }
        }
    </style>
    {{ provider_head? }}
</head>
<body>
    {{ header }}
    {{ content }}
    <div class="theme-toggle-wrapper">{{ theme_toggle? }}</div>
    {{ provider_body? }}
</body>
</html>
"##;

/// Meta-refresh page written at a redirect's source path.
pub const REDIRECT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta http-equiv="refresh" content="0; url={{ redirect_url }}">
    <meta name="robots" content="noindex">
    <link rel="canonical" href="{{ redirect_url }}">
    <title>Redirecting...</title>
</head>
<body>
    <p>Redirecting to <a href="{{ redirect_url }}">{{ redirect_url }}</a></p>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_simple_render() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let mut ctx = TemplateContext::new();
        ctx.insert("name", "World");

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_template_multiple_variables() {
        let template = Template::new("test", "{{ name }} / {{ role }}");
        let ctx = TemplateContext::new()
            .with_var("name", "Bridger Tower")
            .with_var("role", "Designer and Software Engineer");

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Bridger Tower / Designer and Software Engineer");
    }

    #[test]
    fn test_template_optional_variable() {
        let template = Template::new("test", "Hello{{ suffix? }}!");
        let ctx = TemplateContext::new();

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello!");

        let ctx = TemplateContext::new().with_var("suffix", ", World");
        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_template_missing_required_variable() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let ctx = TemplateContext::new();

        let result = template.render(&ctx);
        assert!(matches!(result, Err(TemplateError::MissingVariable(_))));
    }

    #[test]
    fn test_template_unclosed_delimiter() {
        let template = Template::new("test", "Hello, {{ name");
        let result = template.render(&TemplateContext::new());
        assert!(matches!(result, Err(TemplateError::InvalidSyntax(_))));
    }

    #[test]
    fn test_inserted_values_not_rescanned() {
        let template = Template::new("test", "<pre>{{ code }}</pre>");
        let ctx = TemplateContext::new().with_var("code", "let x = {{ y }};");

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "<pre>let x = {{ y }};</pre>");
    }

    #[test]
    fn test_template_registry() {
        let registry = TemplateRegistry::new();

        assert!(registry.get("base").is_some());
        assert!(registry.get("redirect").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(matches!(
            registry.render("nonexistent", &TemplateContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_render_base_template() {
        let registry = TemplateRegistry::new();
        let ctx = TemplateContext::new()
            .with_var("lang", "en")
            .with_var("title", "Payload + R2")
            .with_var("site_title", "Bridger Tower")
            .with_var("canonical_url", "https://bridger.to/posts/payload-r2")
            .with_var("header", "<header></header>")
            .with_var("content", "<main><p>Hello!</p></main>");

        let result = registry.render("base", &ctx).unwrap();
        assert!(result.starts_with("<!DOCTYPE html>"));
        assert!(result.contains("<title>Payload + R2</title>"));
        assert!(result.contains("<main><p>Hello!</p></main>"));
        assert!(result.contains(r#"<meta name="description" content="">"#));
    }

    #[test]
    fn test_render_redirect_template() {
        let registry = TemplateRegistry::new();
        let ctx = TemplateContext::new().with_var("redirect_url", "https://ampry.com");

        let result = registry.render("redirect", &ctx).unwrap();
        assert!(result.contains(r#"content="0; url=https://ampry.com""#));
    }
}
