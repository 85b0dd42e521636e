//! The normalized record every extractor produces.
//!
//! The source type is not stored separately: it is derived from the
//! [`Meta`] variant, so the two can never disagree.

use serde::{Deserialize, Serialize};

/// Kind of upstream resource a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    RedditPost,
    RedditComment,
    TwitterTweet,
    YoutubeVideo,
    #[serde(rename = "url")]
    GenericPage,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RedditPost => "reddit_post",
            Self::RedditComment => "reddit_comment",
            Self::TwitterTweet => "twitter_tweet",
            Self::YoutubeVideo => "youtube_video",
            Self::GenericPage => "url",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link preview data for a single URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Upstream-native id, unique within the source type.
    pub source_key: String,
    /// The caller-supplied URL, set by the scraper after extraction.
    pub url: String,
    pub title: String,
    pub description: String,
    /// Display name of the credited author.
    pub credit_title: String,
    /// Profile URL of the credited author.
    pub credit_url: String,
    /// Image URLs in upstream display order.
    pub thumbnail_sources: Vec<String>,
    #[serde(flatten)]
    pub meta: Meta,
}

impl NormalizedRecord {
    /// Create an empty record for the given metadata payload.
    pub fn new(source_key: impl Into<String>, meta: Meta) -> Self {
        Self {
            source_key: source_key.into(),
            url: String::new(),
            title: String::new(),
            description: String::new(),
            credit_title: String::new(),
            credit_url: String::new(),
            thumbnail_sources: Vec::new(),
            meta,
        }
    }

    pub fn source_type(&self) -> SourceType {
        self.meta.source_type()
    }

    /// First thumbnail, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail_sources.first().map(String::as_str)
    }
}

/// Source-specific metadata, one variant per [`SourceType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source_type", content = "meta", rename_all = "snake_case")]
pub enum Meta {
    RedditPost(RedditMeta),
    RedditComment(RedditMeta),
    #[serde(rename = "twitter_tweet")]
    Tweet(TweetMeta),
    #[serde(rename = "youtube_video")]
    Video(VideoMeta),
    #[serde(rename = "url")]
    Page(PageMeta),
}

impl Meta {
    pub fn source_type(&self) -> SourceType {
        match self {
            Self::RedditPost(_) => SourceType::RedditPost,
            Self::RedditComment(_) => SourceType::RedditComment,
            Self::Tweet(_) => SourceType::TwitterTweet,
            Self::Video(_) => SourceType::YoutubeVideo,
            Self::Page(_) => SourceType::GenericPage,
        }
    }
}

/// Fields shared by Reddit posts and comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditMeta {
    pub author: String,
    /// Comment text; empty for posts.
    pub body: String,
    /// Unix seconds.
    pub created: f64,
    pub permalink: String,
    /// e.g. `AskReddit`
    pub subreddit: String,
    /// e.g. `r/AskReddit`
    pub subreddit_prefixed: String,
    /// Fullname of the parent post (comments only).
    pub link_id: String,
    pub spoiler: bool,
    pub over_18: bool,
    pub url: String,
    pub crossposts: Vec<RedditCrosspost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditCrosspost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub subreddit_prefixed: String,
    pub permalink: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetMeta {
    pub author_avatar: String,
    pub author_name: String,
    pub author_screen_name: String,
    pub content: String,
    pub created_at: String,
    pub likes_count: u64,
    pub quote_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Compact form, e.g. `3m54s` or `1h00m05s`.
    pub duration: String,
    pub duration_secs: u64,
    pub tags: Vec<String>,
    pub channel_id: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub site_name: Option<String>,
    pub canonical_url: Option<String>,
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_follows_meta_variant() {
        let record = NormalizedRecord::new("abc", Meta::RedditComment(RedditMeta::default()));
        assert_eq!(record.source_type(), SourceType::RedditComment);

        let record = NormalizedRecord::new("https://example.com", Meta::Page(PageMeta::default()));
        assert_eq!(record.source_type(), SourceType::GenericPage);
        assert_eq!(record.source_type().as_str(), "url");
    }

    #[test]
    fn serializes_source_type_next_to_meta() {
        let mut record = NormalizedRecord::new(
            "DP0t2MmOMEA",
            Meta::Video(VideoMeta {
                duration: "3m54s".to_string(),
                duration_secs: 234,
                ..VideoMeta::default()
            }),
        );
        record.title = "Wood Ash Cement".to_string();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source_type"], "youtube_video");
        assert_eq!(json["meta"]["duration"], "3m54s");
        assert_eq!(json["source_key"], "DP0t2MmOMEA");
        assert_eq!(json["title"], "Wood Ash Cement");
    }

    #[test]
    fn deserializes_back_to_same_variant() {
        let record = NormalizedRecord::new("1", Meta::Tweet(TweetMeta::default()));
        let json = serde_json::to_string(&record).unwrap();
        let back: NormalizedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn display_matches_wire_name() {
        for (ty, name) in [
            (SourceType::RedditPost, "reddit_post"),
            (SourceType::RedditComment, "reddit_comment"),
            (SourceType::TwitterTweet, "twitter_tweet"),
            (SourceType::YoutubeVideo, "youtube_video"),
            (SourceType::GenericPage, "url"),
        ] {
            assert_eq!(ty.to_string(), name);
            assert_eq!(serde_json::to_value(ty).unwrap(), name);
        }
    }
}
