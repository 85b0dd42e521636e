//! Catch-all extractor for arbitrary web pages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::Extractor;
use crate::api::page::{parse_page, PageFetcher, PageInfo};
use crate::error::Result;
use crate::record::{Meta, NormalizedRecord, PageMeta};

pub struct GenericExtractor {
    fetcher: Arc<dyn PageFetcher>,
}

impl GenericExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Extractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn wants(&self, _url: &str) -> bool {
        true
    }

    fn is_catch_all(&self) -> bool {
        true
    }

    async fn scrape(&self, url: &str) -> Result<NormalizedRecord> {
        let body = self.fetcher.fetch_page(url).await?;
        let info = parse_page(&body, url)?;
        debug!("Parsed {} og:image(s) from {}", info.og_images.len(), url);
        Ok(page_record(url, info))
    }
}

/// Open Graph wins over plain `<title>`/description; `image_src` is only
/// used when no `og:image` exists.
fn page_record(url: &str, info: PageInfo) -> NormalizedRecord {
    let meta = PageMeta {
        site_name: info.og_site_name,
        canonical_url: info.canonical_url,
        author: info.author.clone(),
    };

    let mut record = NormalizedRecord::new(url, Meta::Page(meta));
    record.title = info.og_title.or(info.title).unwrap_or_default();
    record.description = info.og_description.or(info.description).unwrap_or_default();
    record.credit_title = info.author.unwrap_or_default();
    record.thumbnail_sources = if info.og_images.is_empty() {
        info.image_src.into_iter().collect()
    } else {
        info.og_images
    };
    record
}
