//! folio-rs: a personal blog and portfolio server
//!
//! Markdown posts with front-matter are read from flat files on every
//! request and rendered with syntax highlighting. Around them sit JSON
//! proxies for the GitHub events API, a NetEase-style music API and the
//! hitokoto quote service, plus the state behind the site's decorative
//! effects (snowfall, page transitions, background music).

pub mod activity;
pub mod commands;
pub mod config;
pub mod content;
pub mod effects;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod music;
pub mod quote;
pub mod server;
pub mod templates;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The site being served
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Static assets served as-is
    pub public_dir: PathBuf,
    /// Post directories, one per slug
    pub blog_dir: PathBuf,
    /// Destination of `generate`
    pub output_dir: PathBuf,
}

impl Site {
    /// Load a site from a directory: `_config.yml` if present, then the
    /// environment on top
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already assembled configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.blog.public_dir);
        let blog_dir = base_dir.join(&config.blog.blog_dir);
        let output_dir = base_dir.join(&config.blog.output_dir);

        Self {
            config,
            base_dir,
            public_dir,
            blog_dir,
            output_dir,
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}
