//! Upstream page fetching
//!
//! The orchestrator only sees the `Fetcher` trait; `HttpFetcher` is the
//! production implementation over reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use super::LookupError;
use crate::config::LookupConfig;

/// Errors that can occur when building a fetcher from configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Header name is not a valid HTTP token
    #[error("Invalid header name: '{0}'")]
    InvalidHeaderName(String),

    /// Header value contains characters not allowed in HTTP headers
    #[error("Invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Retrieves the raw body of a record page
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, failing with `LookupError::Fetch` on transport errors,
    /// timeouts and non-success status codes
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LookupError>;
}

/// Fetcher over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with the configured timeout and default headers
    pub fn new(config: &LookupConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .default_headers(header_map(&config.headers)?)
            .timeout(config.fetch_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client as-is
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LookupError> {
        info!(url, "fetching record page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        let body = response.bytes().await.map_err(fetch_error)?;

        Ok(body.to_vec())
    }
}

fn fetch_error(e: reqwest::Error) -> LookupError {
    LookupError::Fetch(e.to_string())
}

/// Converts configured header pairs into a reqwest header map
fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (raw_name, raw_value) in headers {
        let name = HeaderName::from_bytes(raw_name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(raw_name.clone()))?;
        let value = HeaderValue::from_str(raw_value)
            .map_err(|_| ConfigError::InvalidHeaderValue(raw_name.clone()))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> LookupConfig {
        let mut config = LookupConfig::default();
        config.set_header("X-Client", "rclookup-test");
        config
    }

    #[test]
    fn test_header_map_from_defaults() {
        let map = header_map(&LookupConfig::default().headers).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("accept-language").unwrap(), "en-US,en;q=0.9");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut config = LookupConfig::default();
        config.set_header("Bad Header", "x");

        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName(ref n) if n == "Bad Header"));
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let mut config = LookupConfig::default();
        config.set_header("X-Test", "line\nbreak");

        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderValue(_)));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rc-search/MH12AB1234"))
            .and(header("x-client", "rclookup-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let body = fetcher
            .fetch(&format!("{}/rc-search/MH12AB1234", server.uri()))
            .await
            .expect("fetch should succeed");

        assert_eq!(body, b"<html>ok</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();

        assert!(matches!(err, LookupError::Fetch(_)));
        assert!(err.to_string().starts_with("Network error:"));
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html>late</html>")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = test_config();
        config.fetch_timeout = Duration::from_millis(50);
        let fetcher = HttpFetcher::new(&config).unwrap();

        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, LookupError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let fetcher = HttpFetcher::with_client(Client::new());
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();

        assert!(matches!(err, LookupError::Fetch(_)));
    }
}
