//! Reddit `/api/info` adapter and response types.
//!
//! `/api/info?id={fullname}` returns a listing whose children are the
//! requested things. Posts and comments share one schema here; fields that
//! only one kind carries default to empty.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::http_client::FetchClient;

pub const REDDIT_INFO_URL: &str = "https://api.reddit.com/api/info";

/// Fetch Reddit things by fullname (`t3_…` posts, `t1_…` comments).
#[async_trait]
pub trait RedditApi: Send + Sync {
    async fn info(&self, fullname: &str) -> Result<Listing>;
}

/// HTTP implementation. Reddit rejects requests without a descriptive
/// `User-Agent`, so one is always sent.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: FetchClient,
    user_agent: String,
}

impl RedditClient {
    pub fn new(http: FetchClient, user_agent: impl Into<String>) -> Self {
        Self {
            http,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl RedditApi for RedditClient {
    async fn info(&self, fullname: &str) -> Result<Listing> {
        let url = format!("{REDDIT_INFO_URL}?id={fullname}");
        tracing::debug!("Fetching from Reddit: {}", url);
        self.http
            .get_json(&url, &[("User-agent", self.user_agent.as_str())])
            .await
    }
}

// ============================================================================
// Reddit API Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Child {
    #[serde(default)]
    pub kind: String,
    pub data: Thing,
}

impl Listing {
    /// First thing in the listing, if any.
    pub fn into_first(self) -> Option<Thing> {
        self.data.children.into_iter().next().map(|c| c.data)
    }
}

/// A post or a comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thing {
    pub id: String,
    pub name: String,
    pub author: String,
    /// Posts only.
    pub title: String,
    /// Comments only.
    pub body: String,
    /// Self-post text.
    pub selftext: String,
    pub created: f64,
    pub permalink: String,
    pub subreddit: String,
    pub subreddit_name_prefixed: String,
    pub link_id: String,
    pub spoiler: bool,
    pub over_18: bool,
    pub url: String,
    pub gallery_data: Option<GalleryData>,
    /// Keyed by media id. Map order is meaningless; use `gallery_data`.
    pub media_metadata: Option<HashMap<String, MediaMetadata>>,
    pub crosspost_parent_list: Vec<Thing>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryData {
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItem {
    pub media_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaMetadata {
    pub status: String,
    /// Media kind, e.g. `Image` or `AnimatedImage`.
    pub e: String,
    pub s: Option<MediaSource>,
}

/// Full-size source of a gallery item. Animated items carry `gif`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaSource {
    pub u: Option<String>,
    pub gif: Option<String>,
}

impl MediaMetadata {
    /// Display URL with HTML-escaped ampersands decoded.
    pub fn display_url(&self) -> Option<String> {
        let source = self.s.as_ref()?;
        let raw = source.u.as_deref().or(source.gif.as_deref())?;
        Some(raw.replace("&amp;", "&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_post_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "jn78c5",
                        "name": "t3_jn78c5",
                        "author": "3minuteboardgames",
                        "title": "The 3 minute board games top 100 games (2020)",
                        "subreddit": "boardgames",
                        "subreddit_name_prefixed": "r/boardgames",
                        "created": 1604329215.0,
                        "spoiler": false,
                        "url": "https://www.youtube.com/watch?v=abc",
                        "media_metadata": null
                    }
                }]
            }
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.children[0].kind, "t3");
        let thing = listing.into_first().unwrap();
        assert_eq!(thing.id, "jn78c5");
        assert_eq!(thing.subreddit_name_prefixed, "r/boardgames");
        assert!(thing.media_metadata.is_none());
        assert!(thing.crosspost_parent_list.is_empty());
    }

    #[test]
    fn empty_listing_has_no_first() {
        let listing: Listing =
            serde_json::from_str(r#"{"kind":"Listing","data":{"children":[]}}"#).unwrap();
        assert!(listing.into_first().is_none());
    }

    #[test]
    fn media_url_decodes_ampersands() {
        let meta: MediaMetadata = serde_json::from_str(
            r#"{"status":"valid","e":"Image","s":{"u":"https://preview.redd.it/a.jpg?width=1&amp;s=x","x":1,"y":1}}"#,
        )
        .unwrap();
        assert_eq!(
            meta.display_url().as_deref(),
            Some("https://preview.redd.it/a.jpg?width=1&s=x")
        );
    }

    #[test]
    fn animated_media_uses_gif_source() {
        let meta: MediaMetadata = serde_json::from_str(
            r#"{"status":"valid","e":"AnimatedImage","s":{"gif":"https://i.redd.it/a.gif","mp4":"x"}}"#,
        )
        .unwrap();
        assert_eq!(meta.display_url().as_deref(), Some("https://i.redd.it/a.gif"));
    }

    #[test]
    fn failed_media_has_no_url() {
        let meta: MediaMetadata = serde_json::from_str(r#"{"status":"failed"}"#).unwrap();
        assert!(meta.display_url().is_none());
    }
}
