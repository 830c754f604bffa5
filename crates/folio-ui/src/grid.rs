//! Rule-of-lines grid used by every page.
//!
//! A [`Grid`] stacks [`Row`]s. Each row always renders exactly [`COLUMNS`]
//! column slots: cells that are not provided become empty bordered cells and
//! cells that do not fit are dropped. Below the `lg` breakpoint a row collapses
//! to a single column.

use tracing::warn;

/// Column slots per row on wide screens.
pub const COLUMNS: usize = 4;

/// Number of columns a [`Child`] occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Span {
    #[default]
    One,
    Two,
    Three,
    Four,
}

impl Span {
    /// Column count.
    #[must_use]
    pub fn columns(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Span for a column count, if it is between 1 and 4.
    #[must_use]
    pub fn from_columns(columns: usize) -> Option<Self> {
        match columns {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::One => "col-span-1",
            Self::Two => "col-span-2",
            Self::Three => "col-span-3",
            Self::Four => "col-span-4",
        }
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Child {
    content: String,
    span: Span,
    classes: Vec<String>,
}

impl Child {
    /// Cell holding trusted HTML.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Empty bordered cell.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the column span.
    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Add a CSS class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Columns this cell occupies.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.span.columns()
    }

    /// Whether the cell has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Render the cell.
    #[must_use]
    pub fn render(&self) -> String {
        let mut class = format!("child {}", self.span.class());
        if self.is_empty() {
            class.push_str(" empty");
        }
        for extra in &self.classes {
            class.push(' ');
            class.push_str(extra);
        }

        if self.is_empty() {
            format!(r#"<div class="{class}" aria-hidden="true"></div>"#)
        } else {
            format!(r#"<div class="{class}">{}</div>"#, self.content)
        }
    }
}

/// A row of exactly [`COLUMNS`] column slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    children: Vec<Child>,
    classes: Vec<String>,
}

impl Row {
    /// Build a row, dropping cells past capacity and padding the rest.
    pub fn new(children: impl IntoIterator<Item = Child>) -> Self {
        let mut used = 0;
        let mut kept = Vec::with_capacity(COLUMNS);

        for child in children {
            let columns = child.columns();
            if used + columns > COLUMNS {
                warn!(
                    span = columns,
                    remaining = COLUMNS - used,
                    "cell does not fit in row, dropping it"
                );
                continue;
            }
            used += columns;
            kept.push(child);
        }

        kept.extend(std::iter::repeat_with(Child::empty).take(COLUMNS - used));

        Self {
            children: kept,
            classes: Vec::new(),
        }
    }

    /// Build a row from at most [`COLUMNS`] cells, checked at compile time.
    ///
    /// ```compile_fail
    /// use folio_ui::{Child, Row};
    /// let _ = Row::from_cells([
    ///     Child::empty(), Child::empty(), Child::empty(), Child::empty(), Child::empty(),
    /// ]);
    /// ```
    pub fn from_cells<const N: usize>(cells: [Child; N]) -> Self {
        const { assert!(N <= COLUMNS, "a row holds at most four cells") };
        Self::new(cells)
    }

    /// Spacer row of four empty cells.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Add a CSS class, e.g. `mobile-only`.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Cells after slot accounting.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Sum of spans. Always [`COLUMNS`].
    #[must_use]
    pub fn columns(&self) -> usize {
        self.children.iter().map(Child::columns).sum()
    }

    /// Render the row.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::from(r#"<div class="row grid-cols-1 lg:grid-cols-4"#);
        for class in &self.classes {
            html.push(' ');
            html.push_str(class);
        }
        html.push_str("\">");
        for child in &self.children {
            html.push_str(&child.render());
        }
        html.push_str("</div>");
        html
    }
}

/// Ringed frame holding rows in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
    classes: Vec<String>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    #[must_use]
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Append several rows.
    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Add a CSS class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Rows in order.
    #[must_use]
    pub fn rows_ref(&self) -> &[Row] {
        &self.rows
    }

    /// Render the grid.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::from(r#"<div class="grid ring"#);
        for class in &self.classes {
            html.push(' ');
            html.push_str(class);
        }
        html.push_str("\">");
        for row in &self.rows {
            html.push_str(&row.render());
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_count(html: &str) -> usize {
        html.matches(r#"<div class="child "#).count()
    }

    #[test]
    fn test_empty_row_has_four_cells() {
        let row = Row::empty();
        assert_eq!(row.children().len(), 4);
        assert!(row.children().iter().all(Child::is_empty));
        assert_eq!(cell_count(&row.render()), 4);
    }

    #[test]
    fn test_row_is_padded_to_capacity() {
        let row = Row::new([Child::new("<h1>Title</h1>").span(Span::Two)]);

        assert_eq!(row.columns(), COLUMNS);
        assert_eq!(row.children().len(), 3);
        assert!(!row.children()[0].is_empty());
        assert!(row.children()[1].is_empty());
    }

    #[test]
    fn test_overflowing_child_is_dropped() {
        let row = Row::new([
            Child::new("a").span(Span::Three),
            Child::new("b").span(Span::Two),
            Child::new("c"),
        ]);

        assert_eq!(row.columns(), COLUMNS);
        let html = row.render();
        assert!(html.contains(">a<"));
        assert!(!html.contains(">b<"));
        assert!(html.contains(">c<"));
    }

    #[test]
    fn test_extra_children_past_four_are_dropped() {
        let row = Row::new((0..6).map(|i| Child::new(i.to_string())));
        assert_eq!(row.children().len(), 4);
        assert!(!row.render().contains(">4<"));
    }

    #[test]
    fn test_from_cells() {
        let row = Row::from_cells([Child::new("x").span(Span::Three), Child::empty()]);
        assert_eq!(row.columns(), 4);
        assert_eq!(row.children().len(), 2);
    }

    #[test]
    fn test_row_responsive_classes() {
        let html = Row::empty().class("mobile-only").render();
        assert!(html.starts_with(r#"<div class="row grid-cols-1 lg:grid-cols-4 mobile-only">"#));
    }

    #[test]
    fn test_child_classes_and_span() {
        let html = Child::new("<p>hi</p>")
            .span(Span::Four)
            .class("prose-cell")
            .render();
        assert_eq!(
            html,
            r#"<div class="child col-span-4 prose-cell"><p>hi</p></div>"#
        );
    }

    #[test]
    fn test_empty_child_markup() {
        assert_eq!(
            Child::empty().render(),
            r#"<div class="child col-span-1 empty" aria-hidden="true"></div>"#
        );
    }

    #[test]
    fn test_grid_renders_rows_in_order() {
        let html = Grid::new()
            .class("home")
            .row(Row::new([Child::new("first")]))
            .row(Row::new([Child::new("second")]))
            .render();

        assert!(html.starts_with(r#"<div class="grid ring home">"#));
        let first = html.find("first").expect("first row");
        let second = html.find("second").expect("second row");
        assert!(first < second);
        assert_eq!(cell_count(&html), 8);
    }

    #[test]
    fn test_span_from_columns() {
        assert_eq!(Span::from_columns(3), Some(Span::Three));
        assert_eq!(Span::from_columns(0), None);
        assert_eq!(Span::from_columns(5), None);
    }
}
