//! Site configuration (_config.yml plus environment overrides)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub blog: BlogConfig,
    pub snow: SnowConfig,
    pub music: MusicConfig,
    pub github: GithubConfig,
    pub hitokoto: HitokotoConfig,
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment (and `.env` if present)
    pub fn apply_env(&mut self) {
        dotenvy::dotenv().ok();
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SITE_URL") {
            self.site.url = v;
        }

        let snow = &mut self.snow;
        let flakes = number_or(lookup("SNOW_MAX_FLAKES"), snow.max_snowflakes as f64);
        if flakes >= 1.0 {
            snow.max_snowflakes = (flakes as usize).min(MAX_SNOWFLAKES);
        }
        if let Some(v) = lookup("SNOW_COLOR").filter(|v| !v.is_empty()) {
            snow.snowflake_color = v;
        }
        snow.min_size = number_or(lookup("SNOW_MIN_SIZE"), snow.min_size);
        snow.max_size = number_or(lookup("SNOW_MAX_SIZE"), snow.max_size);
        snow.min_speed = number_or(lookup("SNOW_MIN_SPEED"), snow.min_speed);
        snow.max_speed = number_or(lookup("SNOW_MAX_SPEED"), snow.max_speed);
        snow.wind = number_or(lookup("SNOW_WIND"), snow.wind);
        snow.z_index = number_or(lookup("SNOW_Z_INDEX"), snow.z_index as f64) as i32;

        if let Some(v) = lookup("CLOUDMUSIC_BASE_URL") {
            self.music.base_url = v;
        }
        if let Some(v) = lookup("CLOUDMUSIC_PLAYLIST_ID") {
            self.music.playlist_id = v;
        }

        if let Some(v) = lookup("GITHUB_USERNAME") {
            self.github.username = v;
        }
        if let Some(v) = lookup("GITHUB_TOKEN") {
            self.github.token = v;
        }

        if let Some(v) = lookup("HITOKOTO_URL") {
            self.hitokoto.url = v;
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}

/// A numeric override where unparsable and zero values fall back to the default
fn number_or(value: Option<String>, default: f64) -> f64 {
    match value.and_then(|v| v.trim().parse::<f64>().ok()) {
        Some(n) if n.is_finite() && n != 0.0 => n,
        _ => default,
    }
}

/// General site information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub title: String,
    pub author: String,
    pub description: String,
    pub url: String,
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            author: String::new(),
            description: String::new(),
            url: "http://localhost:3000".to_string(),
            language: "zh-CN".to_string(),
        }
    }
}

/// Where posts live and how they render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Ordered slugs to publish; empty means every post found in `blog_dir`
    pub posts: Vec<String>,
    pub blog_dir: String,
    pub public_dir: String,
    pub output_dir: String,
    pub highlight_theme: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            blog_dir: "public/blog".to_string(),
            public_dir: "public".to_string(),
            output_dir: "dist".to_string(),
            highlight_theme: "InspiredGitHub".to_string(),
        }
    }
}

/// Upper bound on `max_snowflakes`, whatever the source
const MAX_SNOWFLAKES: usize = 10_000;

/// Snowfall tunables, also served to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct SnowConfig {
    pub max_snowflakes: usize,
    pub snowflake_color: String,
    pub min_size: f64,
    pub max_size: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub wind: f64,
    pub z_index: i32,
}

impl SnowConfig {
    /// `max_snowflakes`, capped
    pub fn flake_limit(&self) -> usize {
        self.max_snowflakes.min(MAX_SNOWFLAKES)
    }
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            max_snowflakes: 100,
            snowflake_color: "white".to_string(),
            min_size: 3.0,
            max_size: 8.0,
            min_speed: 1.0,
            max_speed: 3.0,
            wind: 0.5,
            z_index: 9999,
        }
    }
}

/// Music catalog upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub base_url: String,
    pub playlist_id: String,
    pub timeout_secs: u64,
    pub volume: f32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            playlist_id: String::new(),
            timeout_secs: 10,
            volume: 0.8,
        }
    }
}

/// GitHub events upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub recent_limit: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: String::new(),
            api_url: "https://api.github.com".to_string(),
            poll_interval_secs: 60,
            recent_limit: 5,
        }
    }
}

/// Quote service upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HitokotoConfig {
    pub url: String,
}

impl Default for HitokotoConfig {
    fn default() -> Self {
        Self {
            url: "https://v1.hitokoto.cn".to_string(),
        }
    }
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}
