//! Page components built on the grid.

mod code;
mod meta;
mod post;

pub use code::{CodeBlock, DEFAULT_LANGUAGE};
pub use meta::Meta;
pub use post::PostWrapper;
