//! GitHub REST client for a user's public events

use serde_json::Value;

use crate::config::GithubConfig;
use crate::error::UpstreamError;

/// GitHub events API client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client from the `github` config section.
    pub fn new(config: &GithubConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Fetch the raw event list for a user, newest first.
    ///
    /// The token is optional; without one the unauthenticated rate limit
    /// applies.
    pub async fn fetch_events(&self, username: &str) -> Result<Vec<Value>, UpstreamError> {
        if username.is_empty() {
            return Err(UpstreamError::NotConfigured("github.username"));
        }

        let url = format!("{}/users/{}/events", self.api_url, username);
        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, user = %username, "GitHub events request failed");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let events: Vec<Value> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Payload(format!("events are not a JSON array: {}", e)))?;

        tracing::debug!(count = events.len(), user = %username, "Fetched GitHub events");
        Ok(events)
    }
}
