//! Hitokoto quote client

use serde::{Deserialize, Serialize};

use crate::config::HitokotoConfig;
use crate::error::UpstreamError;

/// A random short quote and where it comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub hitokoto: String,
    #[serde(default)]
    pub from: String,
}

#[derive(Clone)]
pub struct HitokotoClient {
    http: reqwest::Client,
    url: String,
}

impl HitokotoClient {
    pub fn new(config: &HitokotoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
        }
    }

    pub async fn fetch(&self) -> Result<Quote, UpstreamError> {
        if self.url.is_empty() {
            return Err(UpstreamError::NotConfigured("hitokoto.url"));
        }

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Hitokoto request failed");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Payload(format!("unexpected hitokoto payload: {}", e)))
    }
}
