//! Twitter/X statuses via the v1.1 API.
//!
//! Ownership needs no credentials; scraping does. Blank credentials fail
//! before anything goes over the wire.

use std::sync::Arc;

use async_trait::async_trait;

use super::Extractor;
use crate::api::twitter::{Tweet, TwitterApi, TwitterCredentials};
use crate::error::{Result, ScrapeError};
use crate::matcher::tweet_id;
use crate::record::{Meta, NormalizedRecord, TweetMeta};

pub struct TwitterExtractor {
    credentials: TwitterCredentials,
    api: Arc<dyn TwitterApi>,
}

impl TwitterExtractor {
    pub fn new(credentials: TwitterCredentials, api: Arc<dyn TwitterApi>) -> Self {
        Self { credentials, api }
    }
}

#[async_trait]
impl Extractor for TwitterExtractor {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn wants(&self, url: &str) -> bool {
        tweet_id(url).is_some()
    }

    async fn scrape(&self, url: &str) -> Result<NormalizedRecord> {
        self.credentials.validate()?;
        let id = tweet_id(url).ok_or(ScrapeError::UnrecognizedLink("tweet"))?;

        let tweet = self.api.show_status(&self.credentials, id).await?;
        Ok(tweet_record(id, tweet))
    }
}

fn tweet_record(id: u64, tweet: Tweet) -> NormalizedRecord {
    let thumbnail = first_photo(&tweet);
    let screen_name = tweet.user.screen_name;

    let meta = TweetMeta {
        author_avatar: full_size_avatar(&tweet.user.profile_image_url_https),
        author_name: tweet.user.name,
        author_screen_name: screen_name.clone(),
        content: tweet.full_text.clone(),
        created_at: tweet.created_at,
        likes_count: tweet.favorite_count,
        quote_count: tweet.quote_count,
        reply_count: tweet.reply_count,
        retweet_count: tweet.retweet_count,
    };

    let mut record = NormalizedRecord::new(id.to_string(), Meta::Tweet(meta));
    record.title = format!("Tweet by {screen_name}");
    record.description = tweet.full_text;
    record.credit_url = format!("https://twitter.com/{screen_name}");
    record.credit_title = screen_name;
    record.thumbnail_sources = thumbnail.into_iter().collect();
    record
}

/// URL of the first `photo` entity. Videos and GIFs are skipped.
fn first_photo(tweet: &Tweet) -> Option<String> {
    tweet
        .media()
        .iter()
        .find(|media| media.kind == "photo")
        .map(|media| media.media_url_https.clone())
}

/// Profile images come with a `_normal` size suffix; dropping it yields the
/// original upload.
fn full_size_avatar(url: &str) -> String {
    url.replacen("_normal.", ".", 1)
}
