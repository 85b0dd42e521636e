//! Source-specific extractors and the first-match dispatcher.
//!
//! # Architecture
//!
//! - [`Extractor`]: claims a class of URLs and turns one into a [`NormalizedRecord`]
//! - [`Scraper`]: ordered extractor list; the first one that wants a URL scrapes it
//! - [`ScraperBuilder`]: explicit registration, keeps the catch-all last
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use linkcard::site::{generic::GenericExtractor, Scraper};
//! use linkcard::FetchClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let http = FetchClient::new()?;
//! let scraper = Scraper::builder()
//!     .register(GenericExtractor::new(Arc::new(http)))
//!     .build()?;
//!
//! let record = scraper.scrape("https://example.com").await?;
//! println!("{}", record.title);
//! # Ok(())
//! # }
//! ```

pub mod generic;
pub mod reddit;
pub mod twitter;
pub mod youtube;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::{RedditClient, TwitterClient, YouTubeClient};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::http_client::FetchClient;
use crate::record::NormalizedRecord;
use crate::replace::{apply_rules, ReplacementRule};

/// Turns URLs it owns into normalized records.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extractor name (e.g., "reddit", "youtube").
    fn name(&self) -> &'static str;

    /// Whether this extractor owns the URL. Pure; no I/O, no credentials.
    fn wants(&self, url: &str) -> bool;

    /// Catch-all extractors want every URL and are always consulted last.
    fn is_catch_all(&self) -> bool {
        false
    }

    /// Fetch and normalize. Only called for URLs [`wants`](Self::wants) accepted.
    async fn scrape(&self, url: &str) -> Result<NormalizedRecord>;
}

/// Dispatches URLs to the first extractor that wants them.
///
/// Holds only read-only state, so one instance can serve concurrent callers.
pub struct Scraper {
    extractors: Vec<Box<dyn Extractor>>,
    title_rules: Vec<ReplacementRule>,
    description_rules: Vec<ReplacementRule>,
    deadline: Option<Duration>,
}

impl Scraper {
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::default()
    }

    /// Standard extractor set (Reddit, Twitter, YouTube, then generic)
    /// wired from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = FetchClient::with_options(&config.client_options())?;

        let youtube = match config.youtube_files() {
            Some((config_file, token_file)) => youtube::YouTubeExtractor::new(Arc::new(
                YouTubeClient::load(http.clone(), config_file, token_file)?,
            )),
            None => youtube::YouTubeExtractor::unconfigured(),
        };

        let mut builder = Self::builder()
            .register(reddit::RedditExtractor::new(Arc::new(RedditClient::new(
                http.clone(),
                config.reddit_user_agent(),
            ))))
            .register(twitter::TwitterExtractor::new(
                config.twitter_credentials(),
                Arc::new(TwitterClient::new(http.clone())),
            ))
            .register(youtube)
            .register(generic::GenericExtractor::new(Arc::new(http)));

        for rule in &config.title_rules {
            builder = builder.title_rule(ReplacementRule::from_config(rule)?);
        }
        for rule in &config.description_rules {
            builder = builder.description_rule(ReplacementRule::from_config(rule)?);
        }
        if let Some(deadline) = config.deadline() {
            builder = builder.deadline(deadline);
        }

        Ok(builder.build()?)
    }

    /// Registered extractors in dispatch order.
    pub fn extractors(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(AsRef::as_ref)
    }

    /// The extractor that would handle `url`, without fetching anything.
    pub fn extractor_for(&self, url: &str) -> Option<&dyn Extractor> {
        self.extractors().find(|extractor| extractor.wants(url))
    }

    /// Scrape `url` into a record.
    ///
    /// The URL must parse. Exactly one extractor is tried; its error is
    /// returned as is. Title/description rules run on success and the
    /// record's `url` is set to the input.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn scrape(&self, url: &str) -> Result<NormalizedRecord> {
        Url::parse(url).map_err(|source| ScrapeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let extractor = self
            .extractor_for(url)
            .ok_or_else(|| ScrapeError::NoConsumingExtractor(url.to_string()))?;
        debug!("Matched extractor: {}", extractor.name());

        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, extractor.scrape(url))
                .await
                .map_err(|_| ScrapeError::Timeout(deadline))
                .and_then(|inner| inner),
            None => extractor.scrape(url).await,
        };

        let mut record = result.inspect_err(|e| {
            warn!("Extractor {} failed for {}: {}", extractor.name(), url, e);
        })?;

        apply_rules(&self.title_rules, url, &mut record.title);
        apply_rules(&self.description_rules, url, &mut record.description);
        record.url = url.to_string();

        Ok(record)
    }
}

/// Explicit, ordered registration for a [`Scraper`].
#[derive(Default)]
pub struct ScraperBuilder {
    extractors: Vec<Box<dyn Extractor>>,
    title_rules: Vec<ReplacementRule>,
    description_rules: Vec<ReplacementRule>,
    deadline: Option<Duration>,
}

impl ScraperBuilder {
    /// Add an extractor. Specific extractors are tried in registration order.
    #[must_use]
    pub fn register<E: Extractor + 'static>(self, extractor: E) -> Self {
        self.register_boxed(Box::new(extractor))
    }

    #[must_use]
    pub fn register_boxed(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    #[must_use]
    pub fn title_rule(mut self, rule: ReplacementRule) -> Self {
        self.title_rules.push(rule);
        self
    }

    #[must_use]
    pub fn description_rule(mut self, rule: ReplacementRule) -> Self {
        self.description_rules.push(rule);
        self
    }

    /// Upper bound for a single extractor call.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Finish registration. The catch-all, if any, moves behind every
    /// specific extractor; more than one catch-all is rejected.
    pub fn build(self) -> Result<Scraper> {
        let (catch_all, mut extractors): (Vec<_>, Vec<_>) = self
            .extractors
            .into_iter()
            .partition(|extractor| extractor.is_catch_all());

        if catch_all.len() > 1 {
            let names: Vec<&str> = catch_all.iter().map(|e| e.name()).collect();
            return Err(ScrapeError::Registration(format!(
                "more than one catch-all extractor: {}",
                names.join(", ")
            )));
        }
        extractors.extend(catch_all);

        Ok(Scraper {
            extractors,
            title_rules: self.title_rules,
            description_rules: self.description_rules,
            deadline: self.deadline,
        })
    }
}
