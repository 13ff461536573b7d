//! Content module - posts, front-matter and markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter, Metadata};
pub use loader::BlogLoader;
pub use markdown::MarkdownRenderer;
pub use post::{sort_by_date_desc, Post};
