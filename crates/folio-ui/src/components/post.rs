//! Full-width prose row around a rendered document body.

use crate::grid::{Child, Row, Span};

/// Wraps a rendered body in a single full-width `<article class="prose">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostWrapper;

impl PostWrapper {
    /// The wrapping row.
    #[must_use]
    pub fn row(body_html: &str) -> Row {
        Row::new([Child::new(format!(r#"<article class="prose">{body_html}</article>"#))
            .span(Span::Four)])
    }

    /// Render the wrapping row.
    #[must_use]
    pub fn render(body_html: &str) -> String {
        Self::row(body_html).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_full_width_cell() {
        let row = PostWrapper::row("<p>Body</p>");
        assert_eq!(row.children().len(), 1);
        assert_eq!(row.columns(), 4);
    }

    #[test]
    fn test_body_inside_prose_article() {
        let html = PostWrapper::render("<p>Body</p>");
        assert!(html.contains(r#"<div class="child col-span-4"><article class="prose"><p>Body</p></article></div>"#));
    }
}
