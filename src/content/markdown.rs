//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::helpers::html_escape;

lazy_static! {
    static ref RELATIVE_IMAGE_RE: Regex = Regex::new(r"!\[(.*?)]\((\./.*?)\)").unwrap();
    static ref INLINE_A_OPEN_RE: Regex = Regex::new(r"(?i)^<a(\s|>)").unwrap();
    static ref INLINE_A_CLOSE_RE: Regex = Regex::new(r"(?i)^</a\s*>").unwrap();
    static ref BARE_URL_RE: Regex =
        Regex::new(r#"https?://[^\s<>"]*[^\s<>".,;:!?)\]']"#).unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("InspiredGitHub")
    }

    /// Create with a specific highlighting theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render markdown to HTML
    ///
    /// Raw HTML passes through, single newlines become `<br />`, quotes and
    /// dashes are typographically replaced and bare URLs become links.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();
        // links (markdown or inline `<a>`) and image alt text are never linkified
        let mut link_depth = 0usize;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                    link_depth += 1;
                    events.push(Event::Start(tag));
                }
                Event::End(tag @ (TagEnd::Link | TagEnd::Image)) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(Event::End(tag));
                }
                Event::InlineHtml(html) => {
                    if INLINE_A_OPEN_RE.is_match(&html) {
                        link_depth += 1;
                    } else if INLINE_A_CLOSE_RE.is_match(&html) {
                        link_depth = link_depth.saturating_sub(1);
                    }
                    events.push(Event::InlineHtml(html));
                }
                Event::Text(text) if link_depth == 0 => linkify(text, &mut events),
                Event::SoftBreak => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block; unknown languages are escaped verbatim
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l));

        if let (Some(syntax), Some(theme)) = (syntax, self.theme()) {
            let mut highlighter = HighlightLines::new(syntax, theme);
            let mut highlighted = String::new();
            let mut failed = false;

            for line in LinesWithEndings::from(code) {
                let rendered = highlighter
                    .highlight_line(line, &self.syntax_set)
                    .and_then(|regions| {
                        styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                    });
                match rendered {
                    Ok(html) => highlighted.push_str(&html),
                    Err(e) => {
                        tracing::warn!("Failed to highlight {:?} code block: {}", lang, e);
                        failed = true;
                        break;
                    }
                }
            }

            if !failed {
                return format!(r#"<pre class="hljs"><code>{}</code></pre>"#, highlighted);
            }
        }

        format!(
            r#"<pre class="hljs"><code>{}</code></pre>"#,
            html_escape(code)
        )
    }

    /// Point `![alt](./file)` references at the post's asset folder
    pub fn rewrite_relative_images(markdown: &str, slug: &str) -> String {
        RELATIVE_IMAGE_RE
            .replace_all(markdown, |caps: &regex::Captures| {
                let src = caps[2].trim_start_matches("./");
                format!("![{}](/blog/{}/{})", &caps[1], slug, src)
            })
            .into_owned()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a text event around bare URLs, wrapping each URL in a link
fn linkify<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    if !BARE_URL_RE.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL_RE.find_iter(&text) {
        if m.start() > last {
            events.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }
        let url = m.as_str().to_string();
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.clone()),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url)));
        events.push(Event::End(TagEnd::Link));
        last = m.end();
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_single_newline_is_break() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("first line\nsecond line");
        assert!(html.contains("first line<br />"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_render_known_language() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.starts_with(r#"<pre class="hljs"><code>"#));
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_render_unknown_language_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\n<b>x</b>\n```");
        assert!(html.contains(r#"<pre class="hljs"><code>&lt;b&gt;x&lt;/b&gt;"#));
        assert!(!html.contains("<span"));
    }

    #[test]
    fn test_linkify_bare_urls() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("see https://example.com/page, thanks");
        assert!(html.contains(r#"<a href="https://example.com/page">https://example.com/page</a>, thanks"#));
    }

    #[test]
    fn test_existing_links_untouched() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("[https://a.com](https://b.com)");
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://b.com""#));
    }

    #[test]
    fn test_inline_html_links_untouched() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(
            r#"<a href="https://b.com">https://a.com</a> then https://c.com"#,
        );
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains(r#"<a href="https://b.com">https://a.com</a>"#));
        assert!(html.contains(r#"<a href="https://c.com">https://c.com</a>"#));
    }

    #[test]
    fn test_rewrite_relative_images() {
        let md = "![cover](./cover.png) and ![abs](/x.png)";
        let out = MarkdownRenderer::rewrite_relative_images(md, "blog_1");
        assert_eq!(out, "![cover](/blog/blog_1/cover.png) and ![abs](/x.png)");
    }
}
