//! Generator module - writes a static rendition of the site using the
//! built-in Tera templates

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::Post;
use crate::templates::TemplateRenderer;
use crate::view::BlogView;
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site. `posts` are expected newest first.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        let output_dir = &self.site.output_dir;
        fs::create_dir_all(output_dir)?;

        // Assets first so rendered pages win on a name clash
        let copied = self.copy_public_assets()?;
        tracing::debug!("Copied {} asset files", copied);

        self.generate_index(posts)?;
        for post in posts {
            self.generate_post_page(post)?;
        }

        tracing::info!(
            "Wrote {} pages to {}",
            posts.len() + 1,
            output_dir.display()
        );
        Ok(())
    }

    /// The home page in list view, linking each card to its post page
    fn generate_index(&self, posts: &[Post]) -> Result<()> {
        let view = BlogView::new(posts.to_vec());
        let html = self.renderer.render_static_home(&self.site.config, &view)?;
        write_file(&self.site.output_dir.join("index.html"), &html)
    }

    /// `blog/<slug>/index.html`
    fn generate_post_page(&self, post: &Post) -> Result<()> {
        let html = self.renderer.render_post(&self.site.config, post)?;
        let dest = self
            .site
            .output_dir
            .join("blog")
            .join(post.slug())
            .join("index.html");
        write_file(&dest, &html)
    }

    /// Copy everything under the public directory except markdown sources
    fn copy_public_assets(&self) -> Result<usize> {
        let public_dir = &self.site.public_dir;
        if !public_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(public_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&self.site.output_dir))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }

            let relative = path.strip_prefix(public_dir)?;
            let dest = self.site.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        Ok(copied)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
