//! Twitter v1.1 adapter: app-only OAuth2 then `statuses/show`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, ScrapeError};
use crate::http_client::FetchClient;

pub const TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";
pub const STATUS_SHOW_URL: &str = "https://api.twitter.com/1.1/statuses/show.json";

/// Application key and secret for the client-credentials flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl TwitterCredentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Fails on the first blank field.
    pub fn validate(&self) -> Result<()> {
        if self.consumer_key.is_empty() {
            return Err(ScrapeError::MissingCredential {
                provider: "twitter",
                field: "consumer_key",
            });
        }
        if self.consumer_secret.is_empty() {
            return Err(ScrapeError::MissingCredential {
                provider: "twitter",
                field: "consumer_secret",
            });
        }
        Ok(())
    }
}

/// Fetch one tweet in extended-text mode.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    async fn show_status(&self, credentials: &TwitterCredentials, id: u64) -> Result<Tweet>;
}

#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: FetchClient,
}

impl TwitterClient {
    pub fn new(http: FetchClient) -> Self {
        Self { http }
    }

    async fn bearer_token(&self, credentials: &TwitterCredentials) -> Result<String> {
        let token: TokenResponse = self
            .http
            .post_form_json(
                TOKEN_URL,
                Some((
                    credentials.consumer_key.as_str(),
                    credentials.consumer_secret.as_str(),
                )),
                &[("grant_type", "client_credentials")],
            )
            .await?;

        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(ScrapeError::OAuth(format!(
                "unexpected token type '{}'",
                token.token_type
            )));
        }
        Ok(token.access_token)
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn show_status(&self, credentials: &TwitterCredentials, id: u64) -> Result<Tweet> {
        let token = self.bearer_token(credentials).await?;
        let url = format!("{STATUS_SHOW_URL}?id={id}&tweet_mode=extended");
        tracing::debug!("Fetching from Twitter: {}", url);

        let auth = format!("Bearer {token}");
        match self
            .http
            .get_json(&url, &[("Authorization", auth.as_str())])
            .await
        {
            Err(ScrapeError::HttpStatus { status: 404, .. }) => Err(ScrapeError::NotFound {
                kind: "tweet",
                id: id.to_string(),
            }),
            other => other,
        }
    }
}

// ============================================================================
// Twitter API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tweet {
    pub id: u64,
    pub full_text: String,
    pub created_at: String,
    pub favorite_count: u64,
    pub quote_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub user: User,
    pub entities: Entities,
    pub extended_entities: Option<Entities>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub screen_name: String,
    pub profile_image_url_https: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Entities {
    pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaEntity {
    /// `photo`, `video` or `animated_gif`.
    #[serde(rename = "type")]
    pub kind: String,
    pub media_url_https: String,
}

impl Tweet {
    /// Media entities in upstream order, preferring the extended list.
    pub fn media(&self) -> &[MediaEntity] {
        match &self.extended_entities {
            Some(ext) if !ext.media.is_empty() => &ext.media,
            _ => &self.entities.media,
        }
    }
}
