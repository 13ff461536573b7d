//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Metadata;

/// A blog post, rebuilt from its markdown file on every load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug; the post lives at `<blog_dir>/<filename>/<filename>.md`
    pub filename: String,

    /// Front-matter metadata
    pub metadata: Metadata,

    /// Raw markdown body (front-matter removed)
    pub content: String,

    /// Rendered HTML body
    pub html_content: String,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.filename
    }

    pub fn title(&self) -> String {
        self.metadata
            .title()
            .unwrap_or_else(|| self.filename.clone())
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.metadata.parse_date()
    }

    /// Conventional cover image for a post without an `image:` key
    pub fn default_image(slug: &str) -> String {
        format!("/blog/{}/{}_img1.jpg", slug, slug)
    }

    /// Path of the standalone detail page
    pub fn path(&self) -> String {
        format!("/blog/{}", crate::helpers::encode_url(&self.filename))
    }
}

/// Sort newest first. Stable, so equal dates keep their input order;
/// posts without a readable date go last.
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: Option<&str>) -> Post {
        let mut metadata = Metadata::default();
        if let Some(date) = date {
            metadata.insert("date", date);
        }
        Post {
            filename: slug.to_string(),
            metadata,
            content: String::new(),
            html_content: String::new(),
        }
    }

    #[test]
    fn test_sort_desc_and_stable() {
        let mut posts = vec![
            post("old", Some("2023-01-01")),
            post("tie_a", Some("2024-05-01")),
            post("undated", None),
            post("tie_b", Some("2024-05-01")),
            post("new", Some("2025-01-01")),
            post("garbage", Some("not a date")),
        ];
        sort_by_date_desc(&mut posts);
        let order: Vec<_> = posts.iter().map(|p| p.slug()).collect();
        assert_eq!(
            order,
            vec!["new", "tie_a", "tie_b", "old", "undated", "garbage"]
        );
    }

    #[test]
    fn test_json_shape() {
        let mut p = post("blog_1", Some("2024-01-01"));
        p.html_content = "<p>x</p>".to_string();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["filename"], "blog_1");
        assert_eq!(json["metadata"]["date"], "2024-01-01");
        assert_eq!(json["htmlContent"], "<p>x</p>");
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        assert_eq!(post("blog_9", None).title(), "blog_9");
        assert_eq!(Post::default_image("a"), "/blog/a/a_img1.jpg");
    }
}
