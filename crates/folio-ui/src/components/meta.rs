//! Title and description block at the top of a document.

use folio_core::PageMeta;

use crate::{
    escape,
    grid::{Child, Row, Span},
};

/// Renders a document's title and description on the grid.
///
/// Wide screens show the title and description side by side in two 2-column
/// cells. Narrow screens stack the description under the title and add a
/// spacer row.
#[derive(Debug, Clone, Copy)]
pub struct Meta<'a> {
    title: &'a str,
    description: Option<&'a str>,
}

impl<'a> Meta<'a> {
    #[must_use]
    pub fn new(title: &'a str, description: Option<&'a str>) -> Self {
        Self { title, description }
    }

    /// Build from parsed page metadata.
    #[must_use]
    pub fn from_page(meta: &'a PageMeta) -> Self {
        Self::new(&meta.title, meta.description.as_deref())
    }

    /// The title row followed by the mobile-only spacer row.
    #[must_use]
    pub fn rows(&self) -> [Row; 2] {
        let title = escape(self.title);

        let heading = match self.description {
            Some(desc) => format!(
                r#"<h1 class="title">{title}</h1><p class="description mobile-only">{}</p>"#,
                escape(desc)
            ),
            None => format!(r#"<h1 class="title">{title}</h1>"#),
        };

        let aside = match self.description {
            Some(desc) => Child::new(format!(r#"<p class="description">{}</p>"#, escape(desc))),
            None => Child::empty(),
        }
        .span(Span::Two)
        .class("desktop-only");

        [
            Row::new([Child::new(heading).span(Span::Two), aside]),
            Row::empty().class("mobile-only"),
        ]
    }

    /// Render both rows.
    #[must_use]
    pub fn render(&self) -> String {
        self.rows().iter().map(Row::render).collect()
    }
}
