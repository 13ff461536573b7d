//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary so `serve` and `generate` work from
//! nothing but a blog directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{
    date_xml, display_date, excerpt, full_url, html_escape, strip_html, truncate,
};
use crate::view::{BlogView, ViewState};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // `.html` templates autoescape; only rendered post bodies are marked safe
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("partials/card.html", include_str!("site/partials/card.html")),
            ("partials/detail.html", include_str!("site/partials/detail.html")),
            ("partials/widgets.html", include_str!("site/partials/widgets.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Home page in whichever view `view` is in
    pub fn render_home(&self, config: &SiteConfig, view: &BlogView) -> Result<String> {
        self.home(config, view, false)
    }

    /// Home page for a static host: cards link to `/blog/<slug>/` since the
    /// `?blog=` query never reaches a server
    pub fn render_static_home(&self, config: &SiteConfig, view: &BlogView) -> Result<String> {
        self.home(config, view, true)
    }

    fn home(&self, config: &SiteConfig, view: &BlogView, static_links: bool) -> Result<String> {
        let mut context = base_context(config);
        context.insert("static_links", &static_links);
        let base_url = &config.site.url;
        let cards: Vec<CardData> = view
            .posts()
            .iter()
            .map(|post| CardData::from_post(post, base_url))
            .collect();
        context.insert("posts", &cards);
        context.insert("view", view.state());
        if let Some(post) = view.current() {
            context.insert("current", &PostData::from_post(post, base_url));
        }
        if let ViewState::Detail(slug) = view.state() {
            context.insert("slug", slug);
        }
        self.render("index.html", &context)
    }

    /// Standalone detail page
    pub fn render_post(&self, config: &SiteConfig, post: &Post) -> Result<String> {
        let mut context = base_context(config);
        context.insert("post", &PostData::from_post(post, &config.site.url));
        self.render("post.html", &context)
    }

    pub fn render_not_found(&self, config: &SiteConfig, slug: &str) -> Result<String> {
        let mut context = base_context(config);
        context.insert("slug", slug);
        self.render("not_found.html", &context)
    }
}

fn base_context(config: &SiteConfig) -> Context {
    let mut context = Context::new();
    context.insert("config", &ConfigData::from_config(config));
    context
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

/// Tera filter: long-form date ("2024年1月15日"), unparseable input as-is
fn date_format_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    Ok(tera::Value::String(display_date(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub author: String,
    pub description: String,
    pub url: String,
    pub language: String,
    pub github_username: String,
    pub music_enabled: bool,
}

impl ConfigData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.site.title.clone(),
            author: config.site.author.clone(),
            description: config.site.description.clone(),
            url: config.site.url.clone(),
            language: config.site.language.clone(),
            github_username: config.github.username.clone(),
            music_enabled: !config.music.base_url.is_empty()
                && !config.music.playlist_id.is_empty(),
        }
    }
}

/// A list card
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub date: String,
    pub date_xml: String,
    pub image: String,
    pub comments: u64,
    pub tags: Vec<String>,
    pub path: String,
    pub permalink: String,
    pub query: String,
}

/// Card text when a post has no description
const EXCERPT_LENGTH: usize = 120;

impl CardData {
    pub fn from_post(post: &Post, base_url: &str) -> Self {
        let meta = &post.metadata;
        let description = meta
            .description()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| excerpt(&post.html_content, EXCERPT_LENGTH));
        let path = post.path();
        Self {
            slug: post.slug().to_string(),
            title: post.title(),
            description,
            author: meta.author().unwrap_or_default(),
            date: meta.date().unwrap_or_default(),
            date_xml: post.date().map(|d| date_xml(&d)).unwrap_or_default(),
            image: meta
                .image()
                .map(str::to_string)
                .unwrap_or_else(|| Post::default_image(post.slug())),
            comments: meta.comments().unwrap_or(0),
            tags: meta.tags(),
            permalink: full_url(base_url, &path),
            path,
            query: ViewState::Detail(post.slug().to_string()).to_query(),
        }
    }
}

/// A card plus the rendered body
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    #[serde(flatten)]
    pub card: CardData,
    pub content: String,
}

impl PostData {
    pub fn from_post(post: &Post, base_url: &str) -> Self {
        Self {
            card: CardData::from_post(post, base_url),
            content: post.html_content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn post(slug: &str, source: &str, html: &str) -> Post {
        let (metadata, body) = FrontMatter::parse(source);
        Post {
            filename: slug.to_string(),
            metadata,
            content: body.to_string(),
            html_content: html.to_string(),
        }
    }

    #[test]
    fn test_filters() {
        let mut args = HashMap::new();
        let v = strip_html_filter(&tera::Value::from("<p>hi</p>"), &args).unwrap();
        assert_eq!(v, tera::Value::from("hi"));

        args.insert("length".to_string(), tera::Value::from(3));
        let v = truncate_chars_filter(&tera::Value::from("你好世界"), &args).unwrap();
        assert_eq!(v, tera::Value::from("你好世..."));

        let v = date_format_filter(&tera::Value::from("2024-01-15"), &HashMap::new()).unwrap();
        assert_eq!(v, tera::Value::from("2024年1月15日"));
    }

    #[test]
    fn test_render_list_and_detail() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let posts = vec![post(
            "blog_1",
            "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\n---\nbody\n",
            "<p>body</p>",
        )];
        let mut view = BlogView::new(posts);

        let html = renderer.render_home(&config, &view).unwrap();
        assert!(html.contains("Hello"));
        assert!(html.contains("/?blog=blog_1"));
        assert!(!html.contains("<p>body</p>"));

        assert!(view.show_detail("blog_1"));
        let html = renderer.render_home(&config, &view).unwrap();
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("2024年1月1日"));
    }

    #[test]
    fn test_card_falls_back_to_excerpt() {
        let p = post("a", "---\ntitle: \"A\"\n---\n", "<p>First</p>\n<p>Second</p>");
        let card = CardData::from_post(&p, "https://example.com/");
        assert_eq!(card.description, "First Second");
        assert_eq!(card.permalink, "https://example.com/blog/a");

        let p = post("b", "---\ndescription: \"Short\"\n---\n", "<p>Body</p>");
        assert_eq!(CardData::from_post(&p, "").description, "Short");
    }

    #[test]
    fn test_static_home_links_post_pages() {
        let renderer = TemplateRenderer::new().unwrap();
        let view = BlogView::new(vec![post("blog_1", "---\ntitle: \"Hello\"\n---\n", "")]);

        let html = renderer.render_static_home(&SiteConfig::default(), &view).unwrap();
        assert!(html.contains(r#"href="/blog/blog_1/""#));
        assert!(!html.contains("?blog="));
    }

    #[test]
    fn test_escapes_untrusted_text() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_not_found(&SiteConfig::default(), "<script>alert(1)</script>")
            .unwrap();
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));

        let p = post("x", "---\ntitle: \"<b>T</b>\"\n---\n", "<p>body</p>");
        let html = renderer.render_post(&SiteConfig::default(), &p).unwrap();
        assert!(html.contains("&lt;b&gt;T&lt;/b&gt;"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_render_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_not_found(&SiteConfig::default(), "missing")
            .unwrap();
        assert!(html.contains("missing"));
    }
}
