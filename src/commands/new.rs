//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::is_valid_slug;
use crate::content::Metadata;
use crate::Site;

/// Scaffold `<blog_dir>/<slug>/<slug>.md`. The slug defaults to the
/// slugified title.
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = match slug {
        Some(s) if is_valid_slug(s) => s.to_string(),
        Some(s) => anyhow::bail!("Invalid slug: {:?}", s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}; pass --slug", title);
    }

    let post_dir = site.blog_dir.join(&slug);
    let file_path = post_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&post_dir)?;

    let mut metadata = Metadata::default();
    metadata.insert("title", title);
    metadata.insert("date", now.format("%Y-%m-%d %H:%M:%S").to_string());
    metadata.insert("author", site.config.site.author.as_str());
    metadata.insert("description", "");
    metadata.insert("tags", Vec::<String>::new());
    let content = metadata.to_front_matter();

    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::FrontMatter;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        let path = create_post(&site, "Hello World", None).unwrap();
        assert_eq!(path, dir.path().join("public/blog/hello-world/hello-world.md"));

        let source = fs::read_to_string(&path).unwrap();
        let (metadata, body) = FrontMatter::parse(&source);
        assert_eq!(metadata.title().as_deref(), Some("Hello World"));
        assert_eq!(metadata.description().as_deref(), Some(""));
        assert!(metadata.parse_date().is_some());
        assert!(metadata.tags().is_empty());
        assert_eq!(body, "");

        assert!(create_post(&site, "Hello World", None).is_err());
        let path = create_post(&site, "Other", Some("blog_2")).unwrap();
        assert!(path.ends_with("blog_2/blog_2.md"));
        assert!(create_post(&site, "Bad", Some("../x")).is_err());
    }
}
