//! Blog list/detail view state, kept in step with the `?blog=<slug>`
//! query parameter

use serde::Serialize;

use crate::content::Post;
use crate::helpers::encode_url;

/// Query parameter selecting the detail view
pub const BLOG_PARAM: &str = "blog";

/// Which half of the blog section is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "slug", rename_all = "lowercase")]
pub enum ViewState {
    List,
    Detail(String),
}

impl ViewState {
    /// `?blog=<slug>` selects the detail view; absent or empty is the list
    pub fn from_query(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some(slug) if !slug.is_empty() => ViewState::Detail(slug.to_string()),
            _ => ViewState::List,
        }
    }

    /// The address-bar form of this state
    pub fn to_query(&self) -> String {
        match self {
            ViewState::List => "/".to_string(),
            ViewState::Detail(slug) => format!("/?{}={}", BLOG_PARAM, encode_url(slug)),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            ViewState::List => None,
            ViewState::Detail(slug) => Some(slug),
        }
    }
}

/// The blog section: loaded posts, the current view and the post shown in it
#[derive(Debug, Clone)]
pub struct BlogView {
    posts: Vec<Post>,
    state: ViewState,
    current: Option<usize>,
}

impl BlogView {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            state: ViewState::List,
            current: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn current(&self) -> Option<&Post> {
        self.current.and_then(|i| self.posts.get(i))
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.filename == slug)
    }

    /// Replace the loaded posts, keeping the detail view only if its post
    /// is still there
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        match self.state.slug().map(str::to_string) {
            Some(slug) => {
                if !self.show_detail(&slug) {
                    self.show_list();
                }
            }
            None => self.current = None,
        }
    }

    /// Show one post. Returns false, leaving the state alone, when the
    /// slug is not loaded.
    pub fn show_detail(&mut self, slug: &str) -> bool {
        match self.posts.iter().position(|p| p.filename == slug) {
            Some(index) => {
                self.current = Some(index);
                self.state = ViewState::Detail(slug.to_string());
                true
            }
            None => false,
        }
    }

    /// Back to the list; clears the detail state
    pub fn show_list(&mut self) {
        self.current = None;
        self.state = ViewState::List;
    }

    /// Follow the address bar: a parameter naming a loaded post that is not
    /// already shown opens it, no parameter while in detail goes back to
    /// the list. Returns true when the state changed.
    pub fn sync_with_query(&mut self, param: Option<&str>) -> bool {
        match ViewState::from_query(param) {
            ViewState::Detail(slug) => {
                if self.state.slug() == Some(slug.as_str()) {
                    return false;
                }
                self.show_detail(&slug)
            }
            ViewState::List => {
                if self.state == ViewState::List {
                    return false;
                }
                self.show_list();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Metadata;

    fn post(slug: &str) -> Post {
        Post {
            filename: slug.to_string(),
            metadata: Metadata::default(),
            content: String::new(),
            html_content: String::new(),
        }
    }

    #[test]
    fn test_query_round_trip() {
        assert_eq!(ViewState::from_query(None), ViewState::List);
        assert_eq!(ViewState::from_query(Some("")), ViewState::List);
        let detail = ViewState::from_query(Some("blog_1"));
        assert_eq!(detail, ViewState::Detail("blog_1".to_string()));
        assert_eq!(detail.to_query(), "/?blog=blog_1");
        assert_eq!(ViewState::List.to_query(), "/");
        assert_eq!(
            ViewState::Detail("a b".to_string()).to_query(),
            "/?blog=a%20b"
        );
    }

    #[test]
    fn test_toggle_restores_list() {
        let mut view = BlogView::new(vec![post("blog_1"), post("blog_2")]);

        assert!(view.sync_with_query(Some("blog_2")));
        assert_eq!(view.state(), &ViewState::Detail("blog_2".to_string()));
        assert_eq!(view.current().map(|p| p.slug()), Some("blog_2"));

        assert!(view.sync_with_query(None));
        assert_eq!(view.state(), &ViewState::List);
        assert!(view.current().is_none());
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut view = BlogView::new(vec![post("blog_1")]);
        assert!(view.sync_with_query(Some("blog_1")));
        assert!(!view.sync_with_query(Some("blog_1")));
        assert!(!view.sync_with_query(Some("missing")));
        assert_eq!(view.state().slug(), Some("blog_1"));
        assert!(view.sync_with_query(None));
        assert!(!view.sync_with_query(None));
    }

    #[test]
    fn test_unknown_slug_stays_on_list() {
        let mut view = BlogView::new(vec![post("blog_1")]);
        assert!(!view.show_detail("nope"));
        assert_eq!(view.state(), &ViewState::List);
    }

    #[test]
    fn test_reload_drops_vanished_detail() {
        let mut view = BlogView::new(vec![post("blog_1"), post("blog_2")]);
        view.show_detail("blog_2");
        view.set_posts(vec![post("blog_2")]);
        assert_eq!(view.current().map(|p| p.slug()), Some("blog_2"));
        view.set_posts(vec![post("blog_1")]);
        assert_eq!(view.state(), &ViewState::List);
        assert!(view.current().is_none());
    }
}
