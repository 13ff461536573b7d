//! Error types shared by the HTTP surface and the upstream clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure of an outbound call to GitHub, the music API or hitokoto.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("unexpected response: {0}")]
    Payload(String),

    #[error("upstream not configured: {0}")]
    NotConfigured(&'static str),
}

/// Error returned by the HTTP handlers.
///
/// The `Display` text of each variant is the message placed in the JSON body,
/// so it must stay stable: browsers and scripts match on it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    /// An upstream proxy failed. The first field is the public message.
    #[error("{0}")]
    Upstream(&'static str, #[source] UpstreamError),

    /// The music player could not start a song; the text is user-facing
    #[error("{0}")]
    Player(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::music::MusicError> for AppError {
    fn from(err: crate::music::MusicError) -> Self {
        match err {
            crate::music::MusicError::Upstream(source) => {
                AppError::Upstream("API request failed", source)
            }
            other => AppError::Player(other.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(message, source) => {
                tracing::error!(error = %source, "{}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Player(message) => {
                tracing::warn!("Music player error: {}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
