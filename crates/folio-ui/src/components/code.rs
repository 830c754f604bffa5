//! Code block with line numbers, a language label and a copy button.

use crate::{copy::CopyButton, escape, escape_attr};

/// Label used when a fence names no language.
pub const DEFAULT_LANGUAGE: &str = "text";

/// A fenced code block ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    code: String,
    language: String,
}

impl CodeBlock {
    /// Create a code block. Leading blank lines and trailing whitespace are
    /// dropped; a blank language becomes [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn new(code: &str, language: &str) -> Self {
        let code = code.trim_start_matches(['\n', '\r']).trim_end();
        let language = match language.trim() {
            "" => DEFAULT_LANGUAGE,
            lang => lang,
        };

        Self {
            code: code.to_string(),
            language: language.to_string(),
        }
    }

    /// Source as displayed and copied.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Language label.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of rendered rows.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.code.lines().count().max(1)
    }

    /// Copy button bound to this block's source.
    #[must_use]
    pub fn copy_button(&self) -> CopyButton {
        CopyButton::new(self.code.clone())
    }

    /// Render with one pre-highlighted HTML fragment per line.
    ///
    /// Lines without a fragment are rendered as escaped text.
    #[must_use]
    pub fn render(&self, highlighted: &[String]) -> String {
        let language = escape_attr(&self.language);
        let mut html = format!(
            concat!(
                r#"<figure class="code-block" data-language="{lang}">"#,
                r#"<figcaption class="code-header">"#,
                r#"<span class="code-language">{label}</span>"#,
                r#"<button type="button" class="copy-button" data-state="idle" aria-label="Copy code" data-code="{code}">"#,
                r#"<span class="copy-icon">Copy</span><span class="check-icon">Copied</span>"#,
                r#"</button></figcaption>"#,
                r#"<div class="code-scroll"><table class="code-lines"><tbody>"#
            ),
            lang = language,
            label = escape(&self.language),
            code = escape_attr(&self.code),
        );

        let lines: Vec<&str> = if self.code.is_empty() {
            vec![""]
        } else {
            self.code.lines().collect()
        };

        for (i, line) in lines.iter().enumerate() {
            let content = highlighted
                .get(i)
                .cloned()
                .unwrap_or_else(|| escape(line));
            html.push_str(&format!(
                r#"<tr><td class="line-number" aria-hidden="true">{}</td><td class="line"><code>{content}</code></td></tr>"#,
                i + 1
            ));
        }

        html.push_str("</tbody></table></div></figure>");
        html
    }

    /// Render without highlighting.
    #[must_use]
    pub fn render_plain(&self) -> String {
        self.render(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_source() {
        let block = CodeBlock::new("\n\nlet x = 1;\n  \n", "rust");
        assert_eq!(block.code(), "let x = 1;");
        assert_eq!(block.language(), "rust");
    }

    #[test]
    fn test_keeps_first_line_indentation() {
        let block = CodeBlock::new("    indented\nnext\n", "py");
        assert_eq!(block.code(), "    indented\nnext");
    }

    #[test]
    fn test_blank_language_defaults_to_text() {
        assert_eq!(CodeBlock::new("x", "").language(), "text");
        assert_eq!(CodeBlock::new("x", "  ").language(), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_one_numbered_row_per_line() {
        let block = CodeBlock::new("a\nb\nc\n", "text");
        let html = block.render_plain();

        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains(r#"<td class="line-number" aria-hidden="true">3</td>"#));
        assert_eq!(block.line_count(), 3);
    }

    #[test]
    fn test_copy_attribute_holds_exact_source() {
        let block = CodeBlock::new("if a < b && c {\n    \"x\"\n}", "rust");
        let html = block.render_plain();

        let start = html.find("data-code=\"").expect("data-code attribute") + "data-code=\"".len();
        let end = start + html[start..].find('"').expect("closing quote");
        let decoded = html_escape::decode_html_entities(&html[start..end]);

        assert_eq!(decoded, block.code());
        assert_eq!(block.copy_button().code(), block.code());
    }

    #[test]
    fn test_uses_highlighted_fragments() {
        let block = CodeBlock::new("fn a()\nfn b()", "rust");
        let html = block.render(&["<span class=\"kw\">fn</span> a()".to_string()]);

        assert!(html.contains("<code><span class=\"kw\">fn</span> a()</code>"));
        assert!(html.contains("<code>fn b()</code>"));
    }

    #[test]
    fn test_empty_code_renders_one_line() {
        let html = CodeBlock::new("", "").render_plain();
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains(r#"data-language="text""#));
    }

    #[test]
    fn test_escapes_plain_lines() {
        let html = CodeBlock::new("<div>", "html").render_plain();
        assert!(html.contains("<code>&lt;div&gt;</code>"));
    }
}
