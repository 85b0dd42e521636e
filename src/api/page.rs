//! Raw page fetch and Open Graph / HTML metadata parsing.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::http_client::FetchClient;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Fetch a page body. Non-2xx responses are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url, &[("Accept", ACCEPT_HTML)]).await
    }
}

/// Metadata found in a page's `<head>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    /// Every `og:image`, in document order, resolved and deduplicated.
    pub og_images: Vec<String>,
    pub og_site_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// `<link rel="image_src">`
    pub image_src: Option<String>,
    /// `<link rel="canonical">`
    pub canonical_url: Option<String>,
    pub author: Option<String>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta[content]"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("link[rel][href]"));

/// Parse page metadata. Relative URLs resolve against `page_url`.
///
/// A body with no markup at all is a parse failure.
pub fn parse_page(body: &str, page_url: &str) -> Result<PageInfo> {
    if !body.contains('<') {
        return Err(ScrapeError::Parse(format!("no HTML markup in body of {page_url}")));
    }
    let base = Url::parse(page_url).ok();
    let document = Html::parse_document(body);
    let mut info = PageInfo::default();

    info.title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>())
        .and_then(non_empty);

    for el in document.select(&META) {
        let value = el.value();
        let Some(content) = value.attr("content").and_then(non_empty) else {
            continue;
        };
        // OG uses `property`; plenty of sites use `name` instead.
        let key = value
            .attr("property")
            .or_else(|| value.attr("name"))
            .map(str::to_ascii_lowercase);
        let Some(key) = key else {
            continue;
        };

        match key.as_str() {
            "og:title" => set_once(&mut info.og_title, content),
            "og:description" => set_once(&mut info.og_description, content),
            "og:site_name" => set_once(&mut info.og_site_name, content),
            "og:image" | "og:image:url" | "og:image:secure_url" => {
                if let Some(resolved) = resolve(base.as_ref(), &content) {
                    if !info.og_images.contains(&resolved) {
                        info.og_images.push(resolved);
                    }
                }
            }
            "description" => set_once(&mut info.description, content),
            "author" | "article:author" => set_once(&mut info.author, content),
            _ => {}
        }
    }

    for el in document.select(&LINK) {
        let value = el.value();
        let (Some(rel), Some(href)) = (value.attr("rel"), value.attr("href")) else {
            continue;
        };
        let Some(href) = resolve(base.as_ref(), href) else {
            continue;
        };
        for rel in rel.split_ascii_whitespace() {
            if rel.eq_ignore_ascii_case("image_src") {
                set_once(&mut info.image_src, href.clone());
            } else if rel.eq_ignore_ascii_case("canonical") {
                set_once(&mut info.canonical_url, href.clone());
            }
        }
    }

    Ok(info)
}

fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn set_once(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}
