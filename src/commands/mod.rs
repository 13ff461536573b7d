//! CLI subcommands

pub mod activity;
pub mod generate;
pub mod list;
pub mod new;
pub mod show;
