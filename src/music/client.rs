//! Music catalog client (NetEase Cloud Music compatible API)

use serde_json::Value;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use super::{parse_playlist, parse_song_url, MusicError, Song};
use crate::config::MusicConfig;
use crate::error::UpstreamError;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// The two proxied catalog calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicAction {
    Playlist,
    SongUrl,
}

impl MusicAction {
    /// Path and query appended to the configured base URL
    pub fn endpoint(&self, id: &str) -> String {
        match self {
            MusicAction::Playlist => format!("/playlist/track/all?id={}", id),
            MusicAction::SongUrl => format!("/song/url?id={}", id),
        }
    }
}

impl FromStr for MusicAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playlist" => Ok(MusicAction::Playlist),
            "songurl" => Ok(MusicAction::SongUrl),
            _ => Err(()),
        }
    }
}

/// Where the player gets songs from
pub trait MusicSource {
    fn load_playlist(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<Vec<Song>, MusicError>> + Send;

    fn song_url(&self, song_id: u64) -> impl Future<Output = Result<String, MusicError>> + Send;
}

/// Music API client.
#[derive(Clone)]
pub struct MusicClient {
    http: reqwest::Client,
    base_url: String,
}

impl MusicClient {
    /// Create a client from the `music` config section. Every request is
    /// aborted after `timeout_secs`.
    pub fn new(config: &MusicConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward one action and return the upstream JSON untouched
    pub async fn fetch(&self, action: MusicAction, id: &str) -> Result<Value, UpstreamError> {
        if self.base_url.is_empty() {
            return Err(UpstreamError::NotConfigured("music.base_url"));
        }

        let url = format!("{}{}", self.base_url, action.endpoint(id));
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, ?action, "Music API request failed");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Payload(format!("music API returned invalid JSON: {}", e)))
    }
}

impl MusicSource for MusicClient {
    async fn load_playlist(&self, playlist_id: &str) -> Result<Vec<Song>, MusicError> {
        let data = self.fetch(MusicAction::Playlist, playlist_id).await?;
        parse_playlist(&data)
    }

    async fn song_url(&self, song_id: u64) -> Result<String, MusicError> {
        let data = self.fetch(MusicAction::SongUrl, &song_id.to_string()).await?;
        parse_song_url(&data)
    }
}
