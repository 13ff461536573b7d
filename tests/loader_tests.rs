//! Post loading from a blog directory on disk.

use folio_rs::content::BlogLoader;
use serde_json::json;
use tempfile::TempDir;

mod common;

#[tokio::test]
async fn test_load_post_from_disk() {
    let dir = TempDir::new().unwrap();
    common::write_posts(&dir, &[("blog_1", common::HELLO)]);
    let site = common::test_site(&dir, |_| {});

    let post = BlogLoader::new(&site)
        .load_post("blog_1")
        .await
        .unwrap()
        .expect("post exists");

    assert_eq!(post.metadata.get("title"), Some(&json!("Hello")));
    assert_eq!(post.metadata.get("date"), Some(&json!("2024-01-01")));
    assert!(!post.html_content.is_empty());
    assert!(!post.html_content.contains("<h1>"));
}

#[tokio::test]
async fn test_missing_post_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    common::write_posts(&dir, &[("blog_1", common::HELLO)]);
    let loader = BlogLoader::new(&common::test_site(&dir, |_| {}));

    assert!(loader.load_post("nope").await.unwrap().is_none());
    assert!(loader.load_post("../blog_1").await.unwrap().is_none());
    assert!(loader.load_post("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_no_front_matter() {
    let dir = TempDir::new().unwrap();
    common::write_posts(&dir, &[("plain", "Just a body.\n")]);
    let loader = BlogLoader::new(&common::test_site(&dir, |_| {}));

    let post = loader.load_post("plain").await.unwrap().unwrap();
    assert_eq!(post.content, "Just a body.\n");
    // only the default cover was added
    assert_eq!(post.metadata.len(), 1);
    assert_eq!(post.metadata.image(), Some("/blog/plain/plain_img1.jpg"));
}

#[tokio::test]
async fn test_load_all_sorts_newest_first() {
    let dir = TempDir::new().unwrap();
    common::write_posts(
        &dir,
        &[
            ("old", "---\ndate: \"2023-05-01\"\n---\nold\n"),
            ("undated", "---\ntitle: \"No date\"\n---\nundated\n"),
            ("new", "---\ndate: \"2024-02-01 08:00:00\"\n---\nnew\n"),
            ("tie_a", "---\ndate: \"2023-08-01\"\n---\na\n"),
            ("tie_b", "---\ndate: \"2023-08-01\"\n---\nb\n"),
        ],
    );
    let site = common::test_site(&dir, |config| {
        config.blog.posts = ["undated", "old", "tie_a", "new", "tie_b", "missing"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    });

    let slugs: Vec<String> = BlogLoader::new(&site)
        .load_all()
        .await
        .into_iter()
        .map(|p| p.filename)
        .collect();

    assert_eq!(slugs, vec!["new", "tie_a", "tie_b", "old", "undated"]);
}

#[tokio::test]
async fn test_discovers_posts_without_config() {
    let dir = TempDir::new().unwrap();
    common::write_posts(&dir, &[("b", common::HELLO), ("a", common::HELLO)]);
    std::fs::create_dir_all(dir.path().join("public/blog/empty")).unwrap();
    let loader = BlogLoader::new(&common::test_site(&dir, |_| {}));

    assert_eq!(loader.slugs(), vec!["a", "b"]);
}
