//! HTTP page fetcher
//!
//! This module provides the [`PageFetcher`] seam used by the course and the
//! lecture tasks, and [`HttpFetcher`], its reqwest implementation:
//! - One uniform timeout for connecting and for the whole request
//! - No retries; a failed request is reported once
//! - Body decoding by the charset announced in `Content-Type`

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::utils::error::FetchError;

/// Fetches one page as text
///
/// Implementations are stateless between calls and shared across lecture
/// tasks through `Arc<dyn PageFetcher>`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the decoded body
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Page fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Timeout applied to every request
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from the fetch configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be created
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::with_config(config.timeout(), config.user_agent.as_deref())
    }

    /// Create a fetcher with an explicit timeout and optional user agent
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be created
    pub fn with_config(timeout: Duration, user_agent: Option<&str>) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .gzip(true);

        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    /// Timeout applied to every request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Decode response body using the charset from its Content-Type header
    async fn decode_response(url: &str, response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        decode_bytes(&bytes, &content_type).map_err(|reason| FetchError::Decode {
            url: url.to_string(),
            reason,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Self::decode_response(url, response).await
    }
}

/// Decode bytes to a string using the `charset` parameter of `content_type`
///
/// UTF-8 is assumed when no charset is announced. Malformed input and unknown
/// charsets are rejected.
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, String> {
    let encoding = match charset_label(content_type) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| format!("unsupported charset '{label}'"))?,
        None => UTF_8,
    };

    let (cow, _encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(format!("malformed {} content", encoding.name()));
    }

    Ok(cow.into_owned())
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}
