//! Folio Core Library
//!
//! Configuration, page metadata, the content model and the redirect table
//! shared by every Folio crate.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod redirect;

pub use config::Config;
pub use content::{ContentPath, Document, Page, TocEntry};
pub use error::{CoreError, Result};
pub use frontmatter::PageMeta;
pub use redirect::{Redirect, RedirectTable};
