//! State behind the site's decorative effects

pub mod snow;
pub mod transition;

pub use snow::{SnowField, Snowflake};
pub use transition::{PageId, PageSwitcher, Step, Timeline};
