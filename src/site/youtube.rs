//! YouTube videos via the Data API v3.

use std::sync::Arc;

use async_trait::async_trait;

use super::Extractor;
use crate::api::youtube::{Video, YouTubeApi};
use crate::duration::{format_compact, parse_iso8601};
use crate::error::{Result, ScrapeError};
use crate::matcher::youtube_video_id;
use crate::record::{Meta, NormalizedRecord, VideoMeta};

/// Without an API client the extractor still claims YouTube URLs, and
/// scraping them reports the missing credential.
pub struct YouTubeExtractor {
    api: Option<Arc<dyn YouTubeApi>>,
}

impl YouTubeExtractor {
    pub fn new(api: Arc<dyn YouTubeApi>) -> Self {
        Self { api: Some(api) }
    }

    pub fn unconfigured() -> Self {
        Self { api: None }
    }
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn wants(&self, url: &str) -> bool {
        youtube_video_id(url).is_some()
    }

    async fn scrape(&self, url: &str) -> Result<NormalizedRecord> {
        let id = youtube_video_id(url).ok_or(ScrapeError::UnrecognizedLink("youtube video"))?;
        let api = self.api.as_ref().ok_or(ScrapeError::MissingCredential {
            provider: "youtube",
            field: "oauth client",
        })?;

        let video = api
            .list_videos(&id)
            .await?
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::NotFound {
                kind: "youtube video",
                id: id.clone(),
            })?;

        video_record(id, video)
    }
}

fn video_record(id: String, video: Video) -> Result<NormalizedRecord> {
    let duration = parse_iso8601(&video.content_details.duration)?;
    let snippet = video.snippet;

    let meta = VideoMeta {
        duration: format_compact(duration),
        duration_secs: duration.as_secs(),
        tags: snippet.tags,
        channel_id: snippet.channel_id.clone(),
        published_at: snippet.published_at,
    };

    let mut record = NormalizedRecord::new(id, Meta::Video(meta));
    record.title = snippet.title;
    record.description = snippet.description;
    record.credit_title = snippet.channel_title;
    record.credit_url = format!("https://www.youtube.com/channel/{}", snippet.channel_id);

    // Only trust "high" when upstream generated thumbnails at all.
    if snippet.thumbnails.default.is_some() {
        if let Some(high) = snippet.thumbnails.high {
            record.thumbnail_sources.push(high.url);
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::youtube::VideoListResponse;
    use crate::record::SourceType;

    struct FakeYouTube {
        response: serde_json::Value,
    }

    #[async_trait]
    impl YouTubeApi for FakeYouTube {
        async fn list_videos(&self, _id: &str) -> Result<VideoListResponse> {
            Ok(serde_json::from_value(self.response.clone())?)
        }
    }

    fn extractor(response: serde_json::Value) -> YouTubeExtractor {
        YouTubeExtractor::new(Arc::new(FakeYouTube { response }))
    }

    fn wood_ash_cement(duration: &str, thumbnails: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "items": [{
                "id": "DP0t2MmOMEA",
                "snippet": {
                    "title": "Primitive Technology: Wood Ash Cement",
                    "description": "I made cement from wood ash.",
                    "channelId": "UCAL3JXZSzSm8AlZyD3nQdBA",
                    "channelTitle": "Primitive Technology",
                    "publishedAt": "2018-05-21T12:00:00Z",
                    "tags": ["primitive", "cement"],
                    "thumbnails": thumbnails
                },
                "contentDetails": {"duration": duration}
            }]
        })
    }

    #[test]
    fn wants_video_urls() {
        let extractor = YouTubeExtractor::unconfigured();
        assert!(extractor.wants("https://www.youtube.com/watch?v=DP0t2MmOMEA"));
        assert!(extractor.wants("https://youtu.be/DP0t2MmOMEA"));
        assert!(!extractor.wants(
            "https://www.reddit.com/r/boardgames/comments/jn78c5/the_3_minute_board_games_top_100_games_2020/"
        ));
        assert!(!extractor.wants("https://wordpress.org/showcase/ladybird-education/"));
        assert!(!extractor.wants("https://google.com"));
        assert!(!extractor.wants("not a real url"));
    }

    #[tokio::test]
    async fn maps_snippet_and_duration() {
        let response = wood_ash_cement(
            "PT3M54S",
            serde_json::json!({
                "default": {"url": "https://i.ytimg.com/vi/DP0t2MmOMEA/default.jpg"},
                "high": {"url": "https://i.ytimg.com/vi/DP0t2MmOMEA/hqdefault.jpg"}
            }),
        );
        let record = extractor(response)
            .scrape("https://www.youtube.com/watch?v=DP0t2MmOMEA&t=432s")
            .await
            .unwrap();

        assert_eq!(record.source_type(), SourceType::YoutubeVideo);
        assert_eq!(record.source_key, "DP0t2MmOMEA");
        assert_eq!(record.title, "Primitive Technology: Wood Ash Cement");
        assert_eq!(record.credit_title, "Primitive Technology");
        assert_eq!(
            record.credit_url,
            "https://www.youtube.com/channel/UCAL3JXZSzSm8AlZyD3nQdBA"
        );
        assert_eq!(
            record.thumbnail_sources,
            ["https://i.ytimg.com/vi/DP0t2MmOMEA/hqdefault.jpg"]
        );
        let Meta::Video(meta) = &record.meta else {
            panic!("expected video meta");
        };
        assert_eq!(meta.duration, "3m54s");
        assert_eq!(meta.duration_secs, 234);
        assert_eq!(meta.tags, ["primitive", "cement"]);
    }

    #[tokio::test]
    async fn short_link_resolves_same_video() {
        let response = wood_ash_cement("PT1H0M5S", serde_json::json!({}));
        let record = extractor(response)
            .scrape("https://youtu.be/DP0t2MmOMEA")
            .await
            .unwrap();
        assert_eq!(record.source_key, "DP0t2MmOMEA");
        assert!(record.thumbnail_sources.is_empty());
        let Meta::Video(meta) = &record.meta else {
            panic!("expected video meta");
        };
        assert_eq!(meta.duration, "1h00m05s");
    }

    #[tokio::test]
    async fn empty_item_list_is_not_found_with_id() {
        let err = extractor(serde_json::json!({"items": []}))
            .scrape("https://youtu.be/gone123")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "youtube video not found: ID: 'gone123'");
    }

    #[tokio::test]
    async fn unconfigured_client_is_missing_credential() {
        let err = YouTubeExtractor::unconfigured()
            .scrape("https://youtu.be/DP0t2MmOMEA")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingCredential { provider: "youtube", .. }));
    }

    #[tokio::test]
    async fn malformed_duration_fails_scrape() {
        let response = wood_ash_cement("3 minutes", serde_json::json!({}));
        let err = extractor(response)
            .scrape("https://youtu.be/DP0t2MmOMEA")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidDuration(_)));
    }
}
