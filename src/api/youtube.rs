//! YouTube Data API v3 adapter.
//!
//! Authenticates with an OAuth2 user token loaded from two files: the Google
//! client config (`client_secret.json` style) and a stored token. Acquiring
//! the token in the first place happens outside this crate.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::http_client::FetchClient;

pub const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// `videos.list(part=contentDetails,snippet, id={id})`.
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    async fn list_videos(&self, id: &str) -> Result<VideoListResponse>;
}

/// Installed/web application credentials from the Google console.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientConfigFile {
    installed: Option<OAuthClientConfig>,
    web: Option<OAuthClientConfig>,
}

impl OAuthClientConfig {
    /// Parse a Google client config JSON document (`installed` or `web`).
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let file: ClientConfigFile =
            serde_json::from_str(json).context("invalid OAuth client config")?;
        file.installed
            .or(file.web)
            .context("OAuth client config has neither 'installed' nor 'web' credentials")
    }
}

/// Stored OAuth2 token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// A token without an expiry is assumed valid. Tokens written by Go's
    /// oauth2 package use the zero time (year 1) for "no expiry".
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| expiry.timestamp() > 0 && expiry <= now)
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// HTTP implementation using a pre-established OAuth client.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: FetchClient,
    config: OAuthClientConfig,
    token: OAuthToken,
}

impl YouTubeClient {
    pub fn new(http: FetchClient, config: OAuthClientConfig, token: OAuthToken) -> Self {
        Self {
            http,
            config,
            token,
        }
    }

    /// Load the client config and token files.
    pub fn load(
        http: FetchClient,
        config_file: &Path,
        token_file: &Path,
    ) -> anyhow::Result<Self> {
        let config_json = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read {}", config_file.display()))?;
        let config = OAuthClientConfig::from_json(&config_json)
            .with_context(|| format!("in {}", config_file.display()))?;

        let token_json = std::fs::read_to_string(token_file)
            .with_context(|| format!("failed to read {}", token_file.display()))?;
        let token: OAuthToken = serde_json::from_str(&token_json)
            .with_context(|| format!("invalid OAuth token in {}", token_file.display()))?;

        Ok(Self::new(http, config, token))
    }

    /// Current access token, refreshed for this call when the stored one
    /// has expired. The refreshed token is not persisted.
    async fn access_token(&self) -> Result<String> {
        if !self.token.is_expired(Utc::now()) {
            return Ok(self.token.access_token.clone());
        }
        let Some(refresh_token) = self.token.refresh_token.as_deref() else {
            return Err(ScrapeError::OAuth(
                "token expired and no refresh token is stored".to_string(),
            ));
        };

        tracing::debug!("Refreshing expired YouTube OAuth token");
        let refreshed: RefreshResponse = self
            .http
            .post_form_json(
                &self.config.token_uri,
                None,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", self.config.client_secret.as_str()),
                ],
            )
            .await?;
        Ok(refreshed.access_token)
    }
}

/// `videos.list` request URL for one id.
pub fn videos_url(id: &str) -> String {
    let mut url = Url::parse(VIDEOS_URL).expect("static URL is valid");
    url.query_pairs_mut()
        .append_pair("part", "contentDetails,snippet")
        .append_pair("id", id);
    url.into()
}

#[async_trait]
impl YouTubeApi for YouTubeClient {
    async fn list_videos(&self, id: &str) -> Result<VideoListResponse> {
        let token = self.access_token().await?;
        let url = videos_url(id);
        tracing::debug!("Fetching from YouTube Data API: {}", url);

        let auth = format!("Bearer {token}");
        self.http
            .get_json(&url, &[("Authorization", auth.as_str())])
            .await
    }
}

// ============================================================================
// YouTube Data API Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoListResponse {
    pub items: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub snippet: Snippet,
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: String,
    pub tags: Vec<String>,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentDetails {
    /// ISO-8601, e.g. `PT3M54S`.
    pub duration: String,
}
