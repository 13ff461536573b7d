//! Print one post

use anyhow::Result;

use crate::content::BlogLoader;
use crate::Site;

/// Print a post as JSON. A missing post is reported, not an error.
pub async fn run(site: &Site, slug: &str) -> Result<()> {
    let loader = BlogLoader::new(site);

    match loader.load_post(slug).await? {
        Some(post) => println!("{}", serde_json::to_string_pretty(&post)?),
        None => println!("Blog not found: {}", slug),
    }

    Ok(())
}
