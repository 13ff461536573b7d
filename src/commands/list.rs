//! List posts

use anyhow::Result;

use crate::content::BlogLoader;
use crate::Site;

/// Print every post, newest first
pub async fn run(site: &Site) -> Result<()> {
    let loader = BlogLoader::new(site);
    let posts = loader.load_all().await;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let date = post
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!("  {} - {} [{}]", date, post.title(), post.slug());
    }

    Ok(())
}
