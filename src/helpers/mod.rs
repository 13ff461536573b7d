//! Helper functions shared by the templates, the API and the CLI

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
