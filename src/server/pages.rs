//! HTML pages: the home page in list or detail view, and standalone posts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{inject_live_reload, AppState};
use crate::error::Result;
use crate::view::{BlogView, ViewState};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/blog/:slug", get(post_page))
}

#[derive(Debug, Deserialize)]
struct HomeQuery {
    blog: Option<String>,
}

fn html_page(state: &AppState, status: StatusCode, html: String) -> Response {
    let html = if state.live_reload {
        inject_live_reload(&html)
    } else {
        html
    };
    (status, Html(html)).into_response()
}

/// `/` shows the list; `/?blog=<slug>` shows that post in place
async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<Response> {
    let posts = state.loader.load_all().await;
    let mut view = BlogView::new(posts);
    view.sync_with_query(query.blog.as_deref());

    let config = &state.site.config;
    if let ViewState::Detail(slug) = ViewState::from_query(query.blog.as_deref()) {
        if view.current().is_none() {
            tracing::debug!(slug = %slug, "Requested post not found");
            let html = state.renderer.render_not_found(config, &slug)?;
            return Ok(html_page(&state, StatusCode::NOT_FOUND, html));
        }
    }

    let html = state.renderer.render_home(config, &view)?;
    Ok(html_page(&state, StatusCode::OK, html))
}

/// Standalone post page. Assets below `/blog/<slug>/` are left to the
/// static file fallback.
async fn post_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let config = &state.site.config;
    match state.loader.load_post(&slug).await? {
        Some(post) => {
            let html = state.renderer.render_post(config, &post)?;
            Ok(html_page(&state, StatusCode::OK, html))
        }
        None => {
            let html = state.renderer.render_not_found(config, &slug)?;
            Ok(html_page(&state, StatusCode::NOT_FOUND, html))
        }
    }
}
