//! Folio Parser Library
//!
//! Content pipeline for Markdown and MDX documents.

pub mod markdown;
pub mod syntax;

use std::path::Path;

use folio_core::{
    config::BuildConfig,
    content::{ContentType, Document},
};
pub use markdown::MarkdownParser;
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error(transparent)]
    Markdown(#[from] markdown::MarkdownError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Trait for content parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<Document>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<Document> {
        Ok(MarkdownParser::parse(self, content, path)?)
    }
}

/// Registry picking the pipeline from the file extension.
#[derive(Debug)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    /// Create a new parser registry with default settings.
    pub fn new() -> Self {
        Self {
            markdown: MarkdownParser::new(),
        }
    }

    /// Create a registry using the theme and code language from build settings.
    pub fn from_build_config(build: &BuildConfig) -> Self {
        Self {
            markdown: MarkdownParser::with_settings(
                &build.syntax_theme,
                &build.default_code_language,
            ),
        }
    }

    /// Parse content, auto-detecting the parser from file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Document> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        match ContentType::from_extension(ext) {
            Some(ContentType::Markdown) => Ok(self.markdown.parse(content, path)?),
            Some(ContentType::Mdx) => Ok(self.markdown.parse_mdx(content, path)?),
            None => Err(ParserError::UnknownExtension(ext.to_string())),
        }
    }

    /// Get the markdown parser.
    pub fn markdown(&self) -> &MarkdownParser {
        &self.markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_markdown() {
        let registry = ParserRegistry::new();
        let content = r#"---
title: "Test"
---

# Hello"#;

        let doc = registry.parse(content, Path::new("test.md")).expect("parse");
        assert_eq!(doc.meta.title, "Test");
    }

    #[test]
    fn test_registry_mdx() {
        let registry = ParserRegistry::new();
        let content = "---\ntitle: Payload + R2\n---\nimport X from \"x\"\n\nBody";

        let doc = registry.parse(content, Path::new("payload-r2.mdx")).expect("parse");
        assert_eq!(doc.meta.title, "Payload + R2");
        assert!(!doc.html.contains("import"));
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = ParserRegistry::new();
        let result = registry.parse("content", Path::new("test.xyz"));

        assert!(matches!(result, Err(ParserError::UnknownExtension(_))));
    }

    #[test]
    fn test_registry_uses_build_settings() {
        let build = BuildConfig {
            default_code_language: "sh".to_string(),
            ..BuildConfig::default()
        };
        let registry = ParserRegistry::from_build_config(&build);
        let doc = registry
            .parse("---\ntitle: T\n---\n```\necho hi\n```\n", Path::new("t.md"))
            .expect("parse");

        assert!(doc.html.contains(r#"data-language="sh""#));
    }

    #[test]
    fn test_missing_title_propagates() {
        let registry = ParserRegistry::new();
        let err = registry
            .parse("---\ndescription: x\n---\nBody", Path::new("posts/t.md"))
            .unwrap_err();

        assert!(matches!(err, ParserError::Markdown(_)));
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_content_parser_trait() {
        let parser = MarkdownParser::new();
        let content = r#"---
title: "Trait Test"
---

Content"#;

        let result: Result<Document> = ContentParser::parse(&parser, content, Path::new("test.md"));
        assert!(result.is_ok());
    }
}
