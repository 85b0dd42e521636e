//! Shared HTTP client for every upstream call.
//!
//! Features:
//! - HTTP/2 when the server negotiates it, HTTP/1.1 otherwise
//! - TLS 1.3 via rustls
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - DNS caching + Happy Eyeballs (IPv4/IPv6 racing)
//! - Connect and whole-request timeouts
//!
//! Non-2xx responses become [`ScrapeError::HttpStatus`]; transport failures
//! pass through as [`ScrapeError::Http`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::error::{Result, ScrapeError};

/// Default `User-Agent` for page fetches and APIs without their own.
pub const DEFAULT_USER_AGENT: &str = concat!("linkcard/", env!("CARGO_PKG_VERSION"));

/// Timeouts and identity for the shared client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client used by all upstream adapters.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new() -> Result<Self> {
        Self::with_options(&ClientOptions::default())
    }

    pub fn with_options(options: &ClientOptions) -> Result<Self> {
        let client = Client::builder()
            // Let the server negotiate HTTP/2
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .user_agent(options.user_agent.clone())
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` with extra headers and return the body as text.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        debug!("Fetching");
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = send_checked(request, url).await?;
        Ok(response.text().await?)
    }

    /// GET `url` and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get_text(url, headers).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a form, optionally with HTTP basic auth, and decode a JSON body.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        basic_auth: Option<(&str, &str)>,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let mut request = self.client.post(url).form(form);
        if let Some((user, password)) = basic_auth {
            request = request.basic_auth(user, Some(password));
        }
        let response = send_checked(request, url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

async fn send_checked(request: RequestBuilder, url: &str) -> Result<reqwest::Response> {
    let response = request.send().await?;

    info!(
        status = %response.status(),
        version = ?response.version(),
        content_encoding = ?response.headers().get("content-encoding"),
        "Response received"
    );

    if !response.status().is_success() {
        return Err(ScrapeError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_identify_crate() {
        let options = ClientOptions::default();
        assert!(options.user_agent.starts_with("linkcard/"));
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builds_with_custom_timeouts() {
        let options = ClientOptions {
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_millis(250),
            timeout: Duration::from_secs(1),
        };
        assert!(FetchClient::with_options(&options).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let options = ClientOptions {
            connect_timeout: Duration::from_millis(200),
            timeout: Duration::from_millis(500),
            ..ClientOptions::default()
        };
        let client = FetchClient::with_options(&options).unwrap();
        let err = client
            .get_text("http://127.0.0.1:9/unreachable", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Http(_)));
    }
}
