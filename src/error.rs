//! Scrape error taxonomy.
//!
//! Every failure aborts the whole scrape. Callers get either a fully
//! populated record or exactly one of these.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while resolving, fetching or normalizing a URL.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no extractor wanted to consume {0}")]
    NoConsumingExtractor(String),

    #[error("{provider} credential is blank: {field}")]
    MissingCredential {
        provider: &'static str,
        field: &'static str,
    },

    /// Upstream answered, but has no such resource (deleted, private, bad id).
    #[error("{kind} not found: ID: '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("gallery media '{0}' missing from media metadata")]
    GalleryMediaNotFound(String),

    #[error("could not find {0} id in link")]
    UnrecognizedLink(&'static str),

    #[error("invalid ISO-8601 duration '{0}'")]
    InvalidDuration(String),

    #[error("invalid replacement pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to parse page: {0}")]
    Parse(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("invalid extractor registration: {0}")]
    Registration(String),

    #[error("scrape timed out after {0:?}")]
    Timeout(Duration),
}

impl ScrapeError {
    /// True when upstream reported the resource as missing rather than the
    /// call itself failing. Lets callers show a "deleted / not found" message.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_offending_id() {
        let err = ScrapeError::NotFound {
            kind: "youtube video",
            id: "DP0t2MmOMEA".to_string(),
        };
        assert_eq!(err.to_string(), "youtube video not found: ID: 'DP0t2MmOMEA'");
        assert!(err.is_not_found());
    }

    #[test]
    fn transport_errors_are_not_not_found() {
        let err = ScrapeError::HttpStatus {
            status: 503,
            url: "https://api.reddit.com/api/info".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_url_keeps_parse_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = ScrapeError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid URL 'not a url'"));
    }
}
