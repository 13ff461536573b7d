//! Upstream proxies against wiremock servers.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use folio_rs::activity::{poll_once, ActivityPoller, GitHubClient, SharedSnapshot};
use folio_rs::config::{GithubConfig, HitokotoConfig, MusicConfig};
use folio_rs::error::UpstreamError;
use folio_rs::music::{MusicAction, MusicClient, MusicSource};
use folio_rs::quote::HitokotoClient;
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn github_config(server: &MockServer, token: &str) -> GithubConfig {
    GithubConfig {
        username: "octocat".to_string(),
        token: token.to_string(),
        api_url: server.uri(),
        ..GithubConfig::default()
    }
}

fn sample_events() -> Value {
    json!([
        {
            "type": "PushEvent",
            "repo": { "name": "octocat/hello" },
            "payload": { "commits": [{ "message": "Fix typo" }] },
            "created_at": "2024-06-01T11:00:00Z"
        },
        {
            "type": "WatchEvent",
            "repo": { "name": "rust-lang/rust" },
            "payload": { "action": "started" },
            "created_at": "2024-06-01T10:00:00Z"
        }
    ])
}

fn music_config(server: &MockServer) -> MusicConfig {
    MusicConfig {
        base_url: server.uri(),
        playlist_id: "123".to_string(),
        ..MusicConfig::default()
    }
}

async fn mount_playlist(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/playlist/track/all"))
        .and(query_param("id", "123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "songs": [{
                "id": 42,
                "name": "晴天",
                "ar": [{ "name": "周杰伦" }],
                "al": { "name": "叶惠美", "picUrl": "http://p.music/42.jpg" },
                "dt": 269000
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_github_events_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .and(header("authorization", "Bearer secret"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::new(&github_config(&server, "secret"));
    let events = client.fetch_events("octocat").await.unwrap();
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_github_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&github_config(&server, ""));
    let err = client.fetch_events("octocat").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status(403)));
}

#[tokio::test]
async fn test_poll_once_replaces_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&github_config(&server, ""));
    let snapshot = SharedSnapshot::default();

    let count = poll_once(&client, "octocat", 1, &snapshot).await.unwrap();
    assert_eq!(count, 1);

    let guard = snapshot.read().await;
    assert_eq!(guard.activities[0].repo, "octocat/hello");
    assert_eq!(guard.activities[0].message, "Fix typo...");
    assert!(guard.updated_at.is_some());
}

#[tokio::test]
async fn test_failed_poll_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&github_config(&server, ""));
    let snapshot = SharedSnapshot::default();

    poll_once(&client, "octocat", 5, &snapshot).await.unwrap();
    assert!(poll_once(&client, "octocat", 5, &snapshot).await.is_err());
    assert_eq!(snapshot.read().await.activities.len(), 2);
}

#[tokio::test]
async fn test_poller_runs_until_stopped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_events()))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&github_config(&server, ""));
    let mut poller = ActivityPoller::new(
        client,
        "octocat".to_string(),
        5,
        Duration::from_millis(200),
    );
    let snapshot = poller.snapshot();

    poller.start();
    poller.start();
    assert!(poller.is_polling());

    // the first tick fires immediately
    for _ in 0..50 {
        if snapshot.read().await.updated_at.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(snapshot.read().await.activities.len(), 2);

    poller.change_interval(Duration::from_secs(3600)).await;
    assert!(poller.is_polling());
    assert_eq!(poller.interval(), Duration::from_secs(3600));

    poller.stop().await;
    assert!(!poller.is_polling());
    let requests = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), requests);
}

#[tokio::test]
async fn test_music_client_passthrough() {
    let server = MockServer::start().await;
    mount_playlist(&server).await;

    let client = MusicClient::new(&music_config(&server));
    let data = client.fetch(MusicAction::Playlist, "123").await.unwrap();
    assert_eq!(data["songs"][0]["name"], "晴天");

    let songs = client.load_playlist("123").await.unwrap();
    assert_eq!(songs[0].artist, "周杰伦");
    assert_eq!(songs[0].album_pic, "http://p.music/42.jpg");
}

#[tokio::test]
async fn test_music_client_rejects_bad_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song/url"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = MusicClient::new(&music_config(&server));
    let err = client.fetch(MusicAction::SongUrl, "1").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Payload(_)));
}

#[tokio::test]
async fn test_music_client_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song/url"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = MusicConfig {
        timeout_secs: 1,
        ..music_config(&server)
    };
    let err = MusicClient::new(&config)
        .fetch(MusicAction::SongUrl, "1")
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(e) if e.is_timeout()));
}

#[tokio::test]
async fn test_music_routes_end_to_end() {
    let server = MockServer::start().await;
    mount_playlist(&server).await;
    Mock::given(method("GET"))
        .and(path("/song/url"))
        .and(query_param("id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{ "id": 42, "url": "http://m.music/42.mp3" }]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let site = common::test_site(&dir, |config| config.music = music_config(&server));
    let (app, _) = common::create_test_app(&site);

    let request = |uri: &str| {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(request("/api/neteasecloudmusic?action=playlist&id=123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], 200);

    let response = app.oneshot(request("/api/music/random")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["song"]["id"], 42);
    assert_eq!(json["song"]["albumPic"], "http://p.music/42.jpg");
    assert_eq!(json["url"], "http://m.music/42.mp3");
}

#[tokio::test]
async fn test_hitokoto() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "hitokoto": "人生若只如初见",
            "from": "木兰词"
        })))
        .mount(&server)
        .await;

    let client = HitokotoClient::new(&HitokotoConfig { url: server.uri() });
    let quote = client.fetch().await.unwrap();
    assert_eq!(quote.hitokoto, "人生若只如初见");
    assert_eq!(quote.from, "木兰词");
}
