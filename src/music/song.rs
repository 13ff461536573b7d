//! Song records projected from catalog responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MusicError;

/// A playable track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: u64,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub album_pic: String,
    /// Length in milliseconds
    pub duration: u64,
}

impl Song {
    /// Project one entry of a playlist's `songs` array
    pub fn from_track(track: &Value) -> Option<Self> {
        let id = track.get("id")?.as_u64()?;

        let artists: Vec<&str> = track
            .get("ar")
            .and_then(Value::as_array)
            .map(|ar| {
                ar.iter()
                    .filter_map(|a| a.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        let artist = if artists.is_empty() {
            "未知艺术家".to_string()
        } else {
            artists.join(" / ")
        };

        let album = track.get("al");
        let album_name = album
            .and_then(|al| al.get("name"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("未知专辑");
        let album_pic = album
            .and_then(|al| al.get("picUrl"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self {
            id,
            name: track
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            artist,
            album: album_name.to_string(),
            album_pic: album_pic.to_string(),
            duration: track.get("dt").and_then(Value::as_u64).unwrap_or(0),
        })
    }
}

fn is_ok_code(data: &Value) -> bool {
    data.get("code").and_then(Value::as_i64) == Some(200)
}

/// Read a playlist response: `code` 200 and a `songs` array are required
pub fn parse_playlist(data: &Value) -> Result<Vec<Song>, MusicError> {
    let songs = data.get("songs").and_then(Value::as_array);

    match songs {
        Some(songs) if is_ok_code(data) => {
            let parsed: Vec<Song> = songs.iter().filter_map(Song::from_track).collect();
            if parsed.len() < songs.len() {
                tracing::warn!(
                    "Skipped {} playlist entries without an id",
                    songs.len() - parsed.len()
                );
            }
            Ok(parsed)
        }
        _ => {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("加载歌单失败");
            Err(MusicError::Playlist(message.to_string()))
        }
    }
}

/// Read a song URL response: `code` 200 and a non-empty `data[0].url`
pub fn parse_song_url(data: &Value) -> Result<String, MusicError> {
    if !is_ok_code(data) {
        return Err(MusicError::SongUrl);
    }
    data.pointer("/data/0/url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(MusicError::SongUrl)
}
