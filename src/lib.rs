//! `linkcard` - link preview scraping
//!
//! Turns a URL into a [`NormalizedRecord`]: title, description, credit line,
//! thumbnails and source-specific metadata.
//!
//! # Features
//!
//! - **Reddit**: posts and comments, image links, galleries, crossposts
//! - **Twitter/X**: statuses via the v1.1 API (app-only auth)
//! - **YouTube**: videos via the Data API v3 with OAuth token refresh
//! - **Generic**: Open Graph with HTML fallbacks for everything else
//! - **Rules**: URL-scoped find/replace on titles and descriptions
//!
//! # Example
//!
//! ```rust,no_run
//! use linkcard::{Config, Scraper};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scraper = Scraper::from_config(&Config::load()?)?;
//!     let record = scraper.scrape("https://youtu.be/DP0t2MmOMEA").await?;
//!     println!("{} ({})", record.title, record.source_type());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod duration;
pub mod error;
pub mod http_client;
pub mod matcher;
pub mod record;
pub mod replace;
pub mod site;

pub use config::Config;
pub use error::{Result, ScrapeError};
pub use http_client::{ClientOptions, FetchClient};
pub use record::{Meta, NormalizedRecord, SourceType};
pub use replace::ReplacementRule;
pub use site::{Extractor, Scraper, ScraperBuilder};

/// Version of linkcard
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
