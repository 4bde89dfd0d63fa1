use crate::config::Config;
use crate::feed::parser::{parse_feed, FeedItemRecord, ParseError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while loading a feed.
///
/// The widget reports all of these identically to the reader; the variants
/// exist for logging and for callers that drive the fetch themselves.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The feed URL could not be parsed or uses an unsupported scheme
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was received but is not a readable feed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Build the HTTP client used for feed requests.
///
/// - Applies the configured request timeout and user agent
/// - Follows at most 3 redirects and fails on redirect loops
pub fn build_client(config: &Config) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .redirect(redirect_policy())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Check that `url_str` is an absolute http(s) URL.
pub fn validate_feed_url(url_str: &str) -> Result<Url, FetchError> {
    let url = Url::parse(url_str).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme {scheme} (only http/https allowed)"
        ))),
    }
}

/// Fetch the raw feed body.
///
/// A single request is made; there is no retry. The body is read as a
/// stream and abandoned once it exceeds `max_bytes`.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - URL is not absolute http(s)
/// - [`FetchError::Network`] - Connection, TLS or client timeout errors
/// - [`FetchError::Timeout`] - Request exceeded `timeout`
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Body exceeded `max_bytes`
/// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    max_bytes: usize,
) -> Result<Vec<u8>, FetchError> {
    let url = validate_feed_url(url)?;
    tracing::debug!(feed = %url, "Fetching feed");

    let response = tokio::time::timeout(timeout, client.get(url.clone()).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, max_bytes).await?;
    tracing::debug!(feed = %url, bytes = bytes.len(), "Feed body received");
    Ok(bytes)
}

/// Fetch a feed and parse it into display records.
pub async fn load_feed(
    client: &reqwest::Client,
    url: &str,
    config: &Config,
) -> Result<Vec<FeedItemRecord>, FetchError> {
    let bytes = fetch_feed(
        client,
        url,
        Duration::from_secs(config.request_timeout_secs),
        config.max_feed_bytes,
    )
    .await?;
    Ok(parse_feed(&bytes, &config.date_format)?)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
