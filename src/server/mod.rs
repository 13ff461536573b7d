//! HTTP server: HTML pages, JSON proxies and live reload

mod api;
mod livereload;
mod pages;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::activity::{ActivityPoller, GitHubClient, SharedSnapshot};
use crate::content::BlogLoader;
use crate::music::MusicClient;
use crate::quote::HitokotoClient;
use crate::templates::TemplateRenderer;
use crate::Site;

pub use livereload::inject_live_reload;

/// Shared state of the HTTP handlers
pub struct AppState {
    pub site: Site,
    pub loader: BlogLoader,
    pub renderer: TemplateRenderer,
    pub github: GitHubClient,
    pub activity: SharedSnapshot,
    pub music: MusicClient,
    pub hitokoto: HitokotoClient,
    pub reload_tx: broadcast::Sender<()>,
    pub live_reload: bool,
}

impl AppState {
    /// Build the state for a site. `activity` is the snapshot the poller
    /// writes into.
    pub fn new(site: &Site, activity: SharedSnapshot) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel(16);
        Ok(Self {
            site: site.clone(),
            loader: BlogLoader::new(site),
            renderer: TemplateRenderer::new()?,
            github: GitHubClient::new(&site.config.github),
            activity,
            music: MusicClient::new(&site.config.music),
            hitokoto: HitokotoClient::new(&site.config.hitokoto),
            reload_tx,
            live_reload: false,
        })
    }

    /// Inject the reload script into served pages
    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }
}

/// Build the complete router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_dir = state.site.public_dir.clone();

    Router::new()
        .merge(pages::routes())
        .merge(api::routes())
        .route("/__livereload", get(livereload::livereload_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let github = &site.config.github;
    let mut poller = ActivityPoller::new(
        GitHubClient::new(github),
        github.username.clone(),
        github.recent_limit,
        Duration::from_secs(github.poll_interval_secs),
    );

    let state = Arc::new(AppState::new(site, poller.snapshot())?.with_live_reload(watch));
    let app = create_router(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    if github.username.is_empty() {
        tracing::info!("github.username not set, activity polling disabled");
    } else {
        poller.start();
    }

    if watch {
        let blog_dir = site.blog_dir.clone();
        let config_path = site.base_dir.join("_config.yml");
        let reload_tx = state.reload_tx.clone();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = livereload::watch_and_reload(blog_dir, config_path, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
