//! Upstream client adapters.
//!
//! One adapter per source. Each wraps the single outbound call an extractor
//! needs and returns the source's native response shape. Extractors depend
//! on the traits only, so they can be driven by in-process fakes.
//!
//! | Source  | Trait          | HTTP implementation |
//! |---------|----------------|---------------------|
//! | Reddit  | [`RedditApi`]  | [`RedditClient`]    |
//! | Twitter | [`TwitterApi`] | [`TwitterClient`]   |
//! | YouTube | [`YouTubeApi`] | [`YouTubeClient`]   |
//! | Any page| [`PageFetcher`]| [`FetchClient`](crate::FetchClient) |

pub mod page;
pub mod reddit;
pub mod twitter;
pub mod youtube;

pub use page::{parse_page, PageFetcher, PageInfo};
pub use reddit::{RedditApi, RedditClient};
pub use twitter::{TwitterApi, TwitterClient, TwitterCredentials};
pub use youtube::{YouTubeApi, YouTubeClient};
