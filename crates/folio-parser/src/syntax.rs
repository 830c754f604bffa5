//! Syntax highlighting for code blocks.

use syntect::{
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Theme used when none is configured. GitHub's light palette.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Syntax highlighting errors.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// Failed to highlight code.
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the specified theme.
    ///
    /// Unknown theme names fall back to [`DEFAULT_THEME`].
    pub fn new(theme: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme = if theme_set.themes.contains_key(theme) {
            theme.to_string()
        } else {
            warn!(theme, fallback = DEFAULT_THEME, "unknown syntax theme");
            DEFAULT_THEME.to_string()
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme,
        }
    }

    /// Active theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Whether a language token maps to a known syntax.
    pub fn supports(&self, lang: &str) -> bool {
        self.syntax_set.find_syntax_by_token(lang).is_some()
    }

    /// Highlight code into one HTML fragment per line.
    ///
    /// Unknown languages are treated as plain text. If highlighting fails
    /// the lines are returned HTML-escaped.
    pub fn highlight_lines(&self, code: &str, lang: &str) -> Vec<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return plain_lines(code);
        };

        match self.try_highlight(code, syntax, theme) {
            Ok(lines) => lines,
            Err(e) => {
                debug!(lang, error = %e, "falling back to plain code");
                plain_lines(code)
            }
        }
    }

    fn try_highlight(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<String>, SyntaxError> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let ranges = highlighter.highlight_line(line, &self.syntax_set)?;
            let html = styled_line_to_highlighted_html(&ranges, IncludeBackground::No)?;
            lines.push(html.replace(['\n', '\r'], ""));
        }

        Ok(lines)
    }
}

fn plain_lines(code: &str) -> Vec<String> {
    code.lines()
        .map(|line| html_escape::encode_text(line).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_one_fragment_per_line() {
        let highlighter = SyntaxHighlighter::default();
        let code = "fn main() {\n    println!(\"Hello\");\n}";
        let lines = highlighter.highlight_lines(code, "rust");

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("<span"));
        assert!(lines[0].contains("main"));
        assert!(lines.iter().all(|l| !l.contains('\n')));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        let lines = highlighter.highlight_lines("some <code>", "unknown_lang_xyz");

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("some &lt;code&gt;"));
    }

    #[test]
    fn test_default_theme_is_github_light() {
        let highlighter = SyntaxHighlighter::default();
        assert_eq!(highlighter.theme_name(), "InspiredGitHub");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        assert_eq!(highlighter.theme_name(), DEFAULT_THEME);
    }

    #[test]
    fn test_plain_lines_escape() {
        assert_eq!(plain_lines("a < b\nc & d"), vec!["a &lt; b", "c &amp; d"]);
    }

    #[test]
    fn test_available_themes() {
        let highlighter = SyntaxHighlighter::default();
        let themes = highlighter.available_themes();

        assert!(themes.contains(&"InspiredGitHub"));
        assert!(themes.contains(&"base16-ocean.dark"));
        assert!(highlighter.supports("rust"));
    }
}
