//! Blog loader - reads posts from `<blog_dir>/<slug>/<slug>.md`

use anyhow::{Context, Result};
use futures_util::future::join_all;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::{sort_by_date_desc, FrontMatter, MarkdownRenderer, Post};
use crate::Site;

/// Loads posts from the blog directory. Nothing is cached: every call reads
/// the files again, so edits show up without a restart.
#[derive(Clone)]
pub struct BlogLoader {
    blog_dir: PathBuf,
    configured: Vec<String>,
    renderer: Arc<MarkdownRenderer>,
}

impl BlogLoader {
    /// Create a new loader for a site
    pub fn new(site: &Site) -> Self {
        let renderer = MarkdownRenderer::with_theme(&site.config.blog.highlight_theme);
        Self::with_renderer(site, Arc::new(renderer))
    }

    /// Create a loader sharing an existing renderer
    pub fn with_renderer(site: &Site, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            blog_dir: site.blog_dir.clone(),
            configured: site.config.blog.posts.clone(),
            renderer,
        }
    }

    pub fn blog_dir(&self) -> &Path {
        &self.blog_dir
    }

    /// The slugs to publish: the configured list, or every post directory
    pub fn slugs(&self) -> Vec<String> {
        if !self.configured.is_empty() {
            return self.configured.clone();
        }
        if !self.blog_dir.exists() {
            return Vec::new();
        }

        let mut slugs: Vec<String> = WalkDir::new(&self.blog_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|slug| self.post_path(slug).is_file())
            .collect();
        slugs.sort();
        slugs
    }

    fn post_path(&self, slug: &str) -> PathBuf {
        self.blog_dir.join(slug).join(format!("{}.md", slug))
    }

    /// Load a single post.
    ///
    /// A slug with no file behind it, or one that is not a plain path
    /// segment, is `Ok(None)`. Other read failures are errors.
    pub async fn load_post(&self, slug: &str) -> Result<Option<Post>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected slug {:?}", slug);
            return Ok(None);
        }

        let path = self.post_path(slug);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read post {:?}", path));
            }
        };

        let renderer = Arc::clone(&self.renderer);
        let slug = slug.to_string();
        let post = tokio::task::spawn_blocking(move || build_post(&renderer, slug, &source))
            .await
            .context("Post rendering task failed")?;

        tracing::debug!("Loaded post {}", post.filename);
        Ok(Some(post))
    }

    /// Load every published post concurrently, newest first.
    /// Posts that fail to load are logged and skipped.
    pub async fn load_all(&self) -> Vec<Post> {
        let slugs = self.slugs();
        let results = join_all(slugs.iter().map(|slug| self.load_post(slug))).await;

        let mut posts: Vec<Post> = results
            .into_iter()
            .zip(&slugs)
            .filter_map(|(result, slug)| match result {
                Ok(Some(post)) => Some(post),
                Ok(None) => {
                    tracing::warn!("Post {} is listed but has no markdown file", slug);
                    None
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {:#}", slug, e);
                    None
                }
            })
            .collect();

        sort_by_date_desc(&mut posts);
        posts
    }
}

/// Parse and render one post from its source text
fn build_post(renderer: &MarkdownRenderer, slug: String, source: &str) -> Post {
    let (mut metadata, body) = FrontMatter::parse(source);

    if metadata.image().is_none() {
        metadata.insert("image", Post::default_image(&slug));
    }

    let processed = MarkdownRenderer::rewrite_relative_images(body, &slug);
    let html_content = renderer.render(&processed);

    Post {
        filename: slug,
        metadata,
        content: body.to_string(),
        html_content,
    }
}

/// A slug must name exactly one directory below the blog dir
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
