//! Reddit posts and comments via `/api/info`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use linkcard::api::RedditClient;
//! use linkcard::site::{reddit::RedditExtractor, Extractor};
//! use linkcard::FetchClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = RedditClient::new(FetchClient::new()?, "linkcard-example/0.1");
//! let extractor = RedditExtractor::new(Arc::new(api));
//!
//! let record = extractor
//!     .scrape("https://www.reddit.com/r/rust/comments/abc123/some_title/")
//!     .await?;
//! println!("{}", record.title);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::Extractor;
use crate::api::reddit::{RedditApi, Thing};
use crate::error::{Result, ScrapeError};
use crate::matcher::{reddit_thing, RedditThingId};
use crate::record::{Meta, NormalizedRecord, RedditCrosspost, RedditMeta};

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpeg", ".jpg", ".gif"];

pub struct RedditExtractor {
    api: Arc<dyn RedditApi>,
}

impl RedditExtractor {
    pub fn new(api: Arc<dyn RedditApi>) -> Self {
        Self { api }
    }

    async fn fetch_thing(&self, id: &RedditThingId) -> Result<Thing> {
        self.api
            .info(&id.fullname())
            .await?
            .into_first()
            .ok_or_else(|| ScrapeError::NotFound {
                kind: match id {
                    RedditThingId::Post(_) => "reddit post",
                    RedditThingId::Comment { .. } => "reddit comment",
                },
                id: id.id().to_string(),
            })
    }
}

#[async_trait]
impl Extractor for RedditExtractor {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn wants(&self, url: &str) -> bool {
        reddit_thing(url).is_some()
    }

    async fn scrape(&self, url: &str) -> Result<NormalizedRecord> {
        let id = reddit_thing(url).ok_or(ScrapeError::UnrecognizedLink("reddit"))?;
        let thing = self.fetch_thing(&id).await?;

        match id {
            RedditThingId::Post(_) => post_record(thing),
            RedditThingId::Comment { .. } => Ok(comment_record(thing)),
        }
    }
}

fn post_record(thing: Thing) -> Result<NormalizedRecord> {
    let thumbnails = post_thumbnails(&thing)?;

    let mut record = NormalizedRecord::new(thing.id.clone(), Meta::RedditPost(reddit_meta(&thing)));
    record.title = thing.title;
    record.description = thing.selftext;
    record.credit_url = author_url(&thing.author);
    record.credit_title = thing.author;
    record.thumbnail_sources = thumbnails;
    Ok(record)
}

fn comment_record(thing: Thing) -> NormalizedRecord {
    let mut record =
        NormalizedRecord::new(thing.id.clone(), Meta::RedditComment(reddit_meta(&thing)));
    record.title = format!("Comment by {}", thing.author);
    record.description = thing.body;
    record.credit_url = author_url(&thing.author);
    record.credit_title = thing.author;
    record
}

/// Image link, else gallery, else the same from the first crosspost parent.
fn post_thumbnails(thing: &Thing) -> Result<Vec<String>> {
    let own = own_thumbnails(thing)?;
    if !own.is_empty() {
        return Ok(own);
    }
    match thing.crosspost_parent_list.first() {
        Some(parent) => own_thumbnails(parent),
        None => Ok(Vec::new()),
    }
}

fn own_thumbnails(thing: &Thing) -> Result<Vec<String>> {
    if is_image_link(&thing.url) {
        return Ok(vec![thing.url.clone()]);
    }
    gallery_thumbnails(thing)
}

/// Gallery image URLs in gallery order.
///
/// `gallery_data.items` is the display order; `media_metadata` is only a
/// lookup table. An item missing from the table fails the whole gallery.
fn gallery_thumbnails(thing: &Thing) -> Result<Vec<String>> {
    let Some(gallery) = &thing.gallery_data else {
        return Ok(Vec::new());
    };
    let media = thing.media_metadata.as_ref();

    gallery
        .items
        .iter()
        .map(|item| {
            media
                .and_then(|m| m.get(&item.media_id))
                .and_then(|meta| meta.display_url())
                .ok_or_else(|| ScrapeError::GalleryMediaNotFound(item.media_id.clone()))
        })
        .collect()
}

fn reddit_meta(thing: &Thing) -> RedditMeta {
    RedditMeta {
        author: thing.author.clone(),
        body: thing.body.clone(),
        created: thing.created,
        permalink: thing.permalink.clone(),
        subreddit: thing.subreddit.clone(),
        subreddit_prefixed: thing.subreddit_name_prefixed.clone(),
        link_id: thing.link_id.clone(),
        spoiler: thing.spoiler,
        over_18: thing.over_18,
        url: thing.url.clone(),
        crossposts: thing
            .crosspost_parent_list
            .iter()
            .map(|parent| RedditCrosspost {
                id: parent.id.clone(),
                title: parent.title.clone(),
                author: parent.author.clone(),
                subreddit_prefixed: parent.subreddit_name_prefixed.clone(),
                permalink: parent.permalink.clone(),
            })
            .collect(),
    }
}

fn author_url(username: &str) -> String {
    format!("https://www.reddit.com/u/{username}")
}

/// Extension check only; query strings defeat it on purpose.
pub fn is_image_link(link: &str) -> bool {
    let lower = link.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
