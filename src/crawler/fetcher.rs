//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building one reusable HTTP client carrying the configured user agent
//! - The fixed politeness delay applied before every request
//! - Bounding each request by the configured timeout
//! - Classifying transport failures

use crate::config::LogicConfig;
use crate::{ConfigError, CrawlError};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on establishing a connection, independent of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A completed HTTP exchange, whatever its status code
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status_code: u16,

    /// Final URL after redirects
    pub final_url: String,

    /// Decoded response body
    pub body: String,
}

/// Failures that prevented an HTTP response from being obtained
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a reqwest error raised while fetching `url`
    fn classify(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect { url, source: error }
        } else if error.is_body() || error.is_decode() {
            Self::Body { url, source: error }
        } else {
            Self::Request { url, source: error }
        }
    }
}

/// Source of page contents for the crawl loop
pub trait PageFetcher {
    /// Fetches a single URL
    ///
    /// Any HTTP status is an `Ok` response; only transport-level failures
    /// (timeout, connection, body decoding) are errors.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Politeness-throttled HTTP fetcher
///
/// One request is in flight at a time, and each one is preceded by the fixed
/// configured delay.
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    /// Builds a fetcher from the crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Client built and delay converted
    /// * `Err(CrawlError)` - The delay is not a representable duration, or the
    ///   client could not be built
    pub fn new(config: &LogicConfig) -> Result<Self, CrawlError> {
        let delay = Duration::try_from_secs_f64(config.delay).map_err(|e| {
            ConfigError::Validation(format!("invalid delay {}s: {}", config.delay, e))
        })?;
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, delay))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        Ok(FetchResponse {
            status_code,
            final_url,
            body,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use corpus_crawler::config::LogicConfig;
/// use corpus_crawler::crawler::build_http_client;
///
/// let config = LogicConfig {
///     user_agent: "CorpusBot/1.0".to_string(),
///     max_docs: 100,
///     delay: 0.5,
///     request_timeout: 10,
///     allowed_domains: vec!["en.wikipedia.org".to_string()],
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &LogicConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.request_timeout);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}
