//! HTTP client with optional rate limiting
//!
//! Provides the HTTP client that handles:
//! - Authentication of API requests
//! - Rate limiting to prevent API throttling
//! - Response body parsing
//! - Streaming downloads to a file
//!
//! No request is ever retried. A failed request is reported to the caller.
//! Transport errors never carry the request URL, which may hold the access
//! token.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    ///
    /// Bounds a whole API request. Downloads are bounded per read instead, so
    /// a large image only fails when the body stalls for this long.
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            rate_limit: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Source of parsed JSON bodies
///
/// Anything that can turn a URL into a JSON document. `HttpClient` is the
/// real implementation; tests script responses directly.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// GET `url` and parse the body as JSON
    async fn get_json_value(&self, url: &Url) -> Result<Value>;
}

/// HTTP client with rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(auth_config);
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, auth_config: AuthConfig) {
        self.authenticator = Authenticator::new(auth_config);
    }

    /// Make an authenticated GET request
    ///
    /// Non-success statuses become `Error::HttpStatus` carrying the body so
    /// callers can inspect API error objects.
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let req = self
            .authenticator
            .apply(self.client.get(url.as_str()).timeout(self.config.timeout));
        let response = self.send(req).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: GET {}", url.path());
        Ok(response)
    }

    /// Make an authenticated GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Stream the body at `url` into a newly created file at `path`
    ///
    /// The request is sent without credentials. The file is truncated if it
    /// exists and removed again when the transfer fails partway. Returns the
    /// number of bytes written.
    pub async fn download_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let req = self.client.get(url);
        let response = self
            .send(req)
            .await
            .map_err(|e| Error::download(url, path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url, path, format!("HTTP {}", status.as_u16())));
        }

        let file = File::create(path)
            .await
            .map_err(|e| Error::download(url, path, format!("failed to create file: {e}")))?;

        match stream_to_file(file, response).await {
            Ok(bytes) => Ok(bytes),
            Err(message) => {
                debug!(path = %path.display(), "removing partial file after error");
                let _ = tokio::fs::remove_file(path).await;
                Err(Error::download(url, path, message))
            }
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e.without_url())
            }
        })
    }
}

#[async_trait]
impl JsonTransport for HttpClient {
    async fn get_json_value(&self, url: &Url) -> Result<Value> {
        self.get_json(url).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_auth", &!self.authenticator.config().is_none())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Write a response body to `file` and flush it
async fn stream_to_file(file: File, response: Response) -> std::result::Result<u64, String> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| format!("network error: {e}"))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| format!("write error: {e}"))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| format!("write error: {e}"))?;

    Ok(bytes_written)
}
