//! Random-play music player state.
//!
//! The player owns the playlist and the current song. Audio element
//! callbacks (`on_*`) drive the loading and playing flags, and every
//! transition is published on a broadcast channel.

use rand::Rng;
use serde::Serialize;
use tokio::sync::broadcast;

use super::{MusicError, MusicSource, Song};

/// Lifecycle notifications
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PlayerEvent {
    LoadStart,
    LoadEnd,
    PlayStart(Song),
    PlayEnd,
    Error { message: String, song: Option<Song> },
}

/// The song picked by `play_random` and the stream to feed the audio element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playback {
    pub song: Song,
    pub url: String,
    pub volume: f32,
}

pub struct MusicPlayer<S> {
    source: S,
    playlist_id: String,
    volume: f32,
    playlist: Vec<Song>,
    current: Option<Song>,
    is_playing: bool,
    is_loading: bool,
    events: broadcast::Sender<PlayerEvent>,
}

impl<S: MusicSource> MusicPlayer<S> {
    pub fn new(source: S, playlist_id: impl Into<String>, volume: f32) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            source,
            playlist_id: playlist_id.into(),
            volume: volume.clamp(0.0, 1.0),
            playlist: Vec::new(),
            current: None,
            is_playing: false,
            is_loading: false,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: PlayerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Load the configured playlist
    pub async fn init(&mut self) -> Result<usize, MusicError> {
        match self.source.load_playlist(&self.playlist_id).await {
            Ok(songs) => {
                tracing::info!("Loaded {} songs from playlist {}", songs.len(), self.playlist_id);
                self.playlist = songs;
                Ok(self.playlist.len())
            }
            Err(e) => {
                tracing::error!("Failed to load playlist {}: {}", self.playlist_id, e);
                self.emit(PlayerEvent::Error {
                    message: e.to_string(),
                    song: None,
                });
                Err(e)
            }
        }
    }

    /// Stop whatever is playing, pick a random song and resolve its URL.
    /// A failed lookup leaves the player idle.
    pub async fn play_random<R: Rng>(&mut self, rng: &mut R) -> Result<Playback, MusicError> {
        if self.playlist.is_empty() {
            self.emit(PlayerEvent::Error {
                message: MusicError::EmptyPlaylist.to_string(),
                song: None,
            });
            return Err(MusicError::EmptyPlaylist);
        }

        if self.is_playing {
            self.stop();
        }

        let song = self.playlist[rng.gen_range(0..self.playlist.len())].clone();
        self.current = Some(song.clone());

        match self.source.song_url(song.id).await {
            Ok(url) => {
                tracing::debug!(id = song.id, name = %song.name, "Playing song");
                self.is_playing = true;
                self.emit(PlayerEvent::PlayStart(song.clone()));
                Ok(Playback {
                    song,
                    url,
                    volume: self.volume,
                })
            }
            Err(e) => {
                tracing::warn!(id = song.id, "Failed to resolve song URL: {}", e);
                self.current = None;
                self.is_playing = false;
                self.emit(PlayerEvent::Error {
                    message: e.to_string(),
                    song: Some(song),
                });
                Err(e)
            }
        }
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current = None;
    }

    pub fn on_load_start(&mut self) {
        self.is_loading = true;
        self.emit(PlayerEvent::LoadStart);
    }

    pub fn on_can_play(&mut self) {
        self.is_loading = false;
        self.emit(PlayerEvent::LoadEnd);
    }

    pub fn on_ended(&mut self) {
        self.is_playing = false;
        self.current = None;
        self.emit(PlayerEvent::PlayEnd);
    }

    pub fn on_media_error(&mut self, message: &str) {
        self.is_playing = false;
        self.is_loading = false;
        self.emit(PlayerEvent::Error {
            message: message.to_string(),
            song: self.current.clone(),
        });
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn playlist(&self) -> &[Song] {
        &self.playlist
    }

    pub fn current(&self) -> Option<&Song> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}
