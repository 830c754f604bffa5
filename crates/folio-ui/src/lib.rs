//! Folio UI Components
//!
//! Server-rendered building blocks shared by every Folio page.
//!
//! # Layout
//! - [`Grid`] - Bordered frame holding rows
//! - [`Row`] - Exactly [`COLUMNS`] column slots
//! - [`Child`] - A cell spanning 1 to 4 columns
//!
//! # Components
//! - [`Meta`] - Title and description rows for a document
//! - [`PostWrapper`] - Full-width prose row around a rendered body
//! - [`CodeBlock`] - Numbered, highlighted code with a copy button
//!
//! # Behaviour
//! - [`CopyButton`] - Copy-to-clipboard state machine
//! - [`Providers`] - Theme, smooth scroll, analytics and toaster integrations
//!
//! # Example
//!
//! ```
//! use folio_ui::{Child, Grid, Row, Span};
//!
//! let html = Grid::new()
//!     .row(Row::new([Child::new("<h1>Hi</h1>").span(Span::Two)]))
//!     .row(Row::empty())
//!     .render();
//! assert!(html.contains("col-span-2"));
//! ```

pub mod components;
pub mod copy;
pub mod grid;
pub mod providers;

pub use components::{CodeBlock, Meta, PostWrapper};
pub use copy::{COPY_RESET, Clipboard, ClipboardError, CopyButton, CopyState, Notifier};
pub use grid::{COLUMNS, Child, Grid, Row, Span};
pub use providers::{AnalyticsProvider, Providers, ScrollProvider, ThemeProvider, Toaster};

/// Escape text for HTML element content.
pub(crate) fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape text for a double-quoted HTML attribute.
pub(crate) fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}
