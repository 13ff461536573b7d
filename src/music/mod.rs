//! Background music: the catalog proxy, song projection and player state

mod client;
mod player;
mod song;

pub use client::{MusicAction, MusicClient, MusicSource};
pub use player::{MusicPlayer, Playback, PlayerEvent};
pub use song::{parse_playlist, parse_song_url, Song};

use crate::error::UpstreamError;

/// Failures of the music player
#[derive(Debug, thiserror::Error)]
pub enum MusicError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Playlist(String),

    #[error("获取歌曲URL失败")]
    SongUrl,

    #[error("歌单为空")]
    EmptyPlaylist,
}
