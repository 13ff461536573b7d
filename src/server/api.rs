//! JSON API: posts, upstream proxies and effect parameters

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::AppState;
use crate::activity::ActivitySnapshot;
use crate::config::SnowConfig;
use crate::content::Post;
use crate::effects::{PageId, PageSwitcher, SnowField, Snowflake, Timeline};
use crate::error::{AppError, Result, UpstreamError};
use crate::music::{MusicAction, MusicPlayer, Playback};
use crate::quote::Quote;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/blog", get(list_blogs))
        .route("/api/blog/:slug", get(get_blog))
        .route("/api/github-activities", get(github_events))
        .route("/api/github-activities/recent", get(recent_activities))
        .route("/api/neteasecloudmusic", get(music_proxy))
        .route("/api/music/random", get(random_song))
        .route("/api/hitokoto", get(hitokoto))
        .route("/api/effects/snow", get(snow_config))
        .route("/api/effects/snow/field", get(snow_field))
        .route("/api/effects/transition/:page", get(transition))
}

// ─── Posts ───────────────────────────────────────────────────

/// All posts, newest first
async fn list_blogs(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    Json(state.loader.load_all().await)
}

async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Post>> {
    let post = state
        .loader
        .load_post(&slug)
        .await?
        .ok_or(AppError::NotFound("Blog not found"))?;
    Ok(Json(post))
}

// ─── GitHub ──────────────────────────────────────────────────

/// The user's raw public events, passed through
async fn github_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>> {
    let username = &state.site.config.github.username;
    let events = state
        .github
        .fetch_events(username)
        .await
        .map_err(|e| AppError::Upstream("Failed to fetch GitHub activities", e))?;
    Ok(Json(events))
}

/// The poller's latest projection
async fn recent_activities(State(state): State<Arc<AppState>>) -> Json<ActivitySnapshot> {
    Json(state.activity.read().await.clone())
}

// ─── Music ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MusicQuery {
    action: Option<String>,
    id: Option<String>,
}

/// `?action=playlist|songurl&id=<numeric id>`
async fn music_proxy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MusicQuery>,
) -> Result<Json<Value>> {
    let (action, id) = match (query.action.as_deref(), query.id.as_deref()) {
        (Some(action), Some(id)) if !action.is_empty() && !id.is_empty() => (action, id),
        _ => return Err(AppError::BadRequest("Missing required parameters")),
    };

    let action: MusicAction = action
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid action"))?;

    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid id"));
    }

    let data = state
        .music
        .fetch(action, id)
        .await
        .map_err(|e| AppError::Upstream("API request failed", e))?;
    Ok(Json(data))
}

/// Load the configured playlist and pick a song to play
async fn random_song(State(state): State<Arc<AppState>>) -> Result<Json<Playback>> {
    let music = &state.site.config.music;
    if music.playlist_id.is_empty() {
        return Err(AppError::Upstream(
            "API request failed",
            UpstreamError::NotConfigured("music.playlist_id"),
        ));
    }

    let mut player = MusicPlayer::new(
        state.music.clone(),
        music.playlist_id.clone(),
        music.volume,
    );
    player.init().await?;

    let mut rng = StdRng::from_entropy();
    let playback = player.play_random(&mut rng).await?;
    Ok(Json(playback))
}

// ─── Hitokoto ────────────────────────────────────────────────

async fn hitokoto(State(state): State<Arc<AppState>>) -> Result<Json<Quote>> {
    let quote = state
        .hitokoto
        .fetch()
        .await
        .map_err(|e| AppError::Upstream("Failed to fetch hitokoto", e))?;
    Ok(Json(quote))
}

// ─── Effects ─────────────────────────────────────────────────

async fn snow_config(State(state): State<Arc<AppState>>) -> Json<SnowConfig> {
    Json(state.site.config.snow.clone())
}

/// Frames a single field request may simulate, ten seconds at 60 fps
const MAX_FRAMES: usize = 600;

#[derive(Debug, Deserialize)]
struct SnowFieldQuery {
    height: Option<f64>,
    frames: Option<usize>,
    seed: Option<u64>,
}

/// A seeded snow field advanced `frames` frames, for a `height`px viewport.
/// The same seed gives the same flakes.
async fn snow_field(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnowFieldQuery>,
) -> Result<Json<Vec<Snowflake>>> {
    let height = query.height.unwrap_or(800.0);
    if !height.is_finite() || height <= 0.0 {
        return Err(AppError::BadRequest("Invalid height"));
    }
    let frames = query.frames.unwrap_or(0).min(MAX_FRAMES);

    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut field = SnowField::new(state.site.config.snow.clone(), height, &mut rng);
    field.run_frames(frames, &mut rng);
    Ok(Json(field.flakes().to_vec()))
}

#[derive(Debug, Deserialize)]
struct TransitionQuery {
    from: Option<String>,
}

/// Timeline for switching from `?from=` (the main page by default) to
/// `page`; `null` when that page is already shown
async fn transition(
    Path(page): Path<String>,
    Query(query): Query<TransitionQuery>,
) -> Result<Json<Option<Timeline>>> {
    let target: PageId = page
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid page"))?;
    let from = match query.from.as_deref() {
        Some(from) => from
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid page"))?,
        None => PageId::MainPage,
    };

    let mut switcher = PageSwitcher::new();
    switcher.show_initial(from);
    Ok(Json(switcher.switch_to(target)))
}
