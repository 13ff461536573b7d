use axum::Router;
use folio_rs::activity::SharedSnapshot;
use folio_rs::config::SiteConfig;
use folio_rs::server::{create_router, AppState};
use folio_rs::Site;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[allow(dead_code)]
/// Write `public/blog/<slug>/<slug>.md` for each post
pub fn write_posts(dir: &TempDir, posts: &[(&str, &str)]) {
    for (slug, source) in posts {
        let post_dir = dir.path().join("public/blog").join(slug);
        fs::create_dir_all(&post_dir).expect("create post dir");
        fs::write(post_dir.join(format!("{}.md", slug)), source).expect("write post");
    }
}

/// A site rooted in a temp dir, configured by `configure`
#[allow(dead_code)]
pub fn test_site(dir: &TempDir, configure: impl FnOnce(&mut SiteConfig)) -> Site {
    let mut config = SiteConfig::default();
    configure(&mut config);
    Site::with_config(dir.path(), config)
}

/// Router plus the snapshot the poller would write into
#[allow(dead_code)]
pub fn create_test_app(site: &Site) -> (Router, SharedSnapshot) {
    let snapshot = SharedSnapshot::default();
    let state = AppState::new(site, Arc::clone(&snapshot)).expect("app state");
    (create_router(Arc::new(state)), snapshot)
}

#[allow(dead_code)]
pub const HELLO: &str = "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\n---\nSome *text* here.\n";
