use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use url::Url;

use super::parser::parse_feed;
use super::source::Source;
use super::types::Entry;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while loading one source.
///
/// Every variant is local to its source: the aggregator logs it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Document could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Local file could not be read
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
    /// Document exceeded the size limit
    #[error("Document too large (limit {0} bytes)")]
    TooLarge(usize),
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Per-source bounds on how long and how much to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_bytes: DEFAULT_MAX_FEED_SIZE,
        }
    }
}

/// Builds the shared HTTP client.
///
/// The client-level timeout backs up the per-request one in [`fetch_url`].
pub fn build_client(limits: &FetchLimits) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(limits.timeout)
        .build()
}

/// Loads and parses either kind of source.
pub async fn load(
    client: &reqwest::Client,
    source: &Source,
    limits: &FetchLimits,
) -> Result<Vec<Entry>, FetchError> {
    match source {
        Source::Remote(url) => fetch_url(client, url, limits).await,
        Source::Local(path) => read_local(path, limits).await,
    }
}

/// Fetches a feed over HTTP and parses it.
///
/// # Errors
///
/// - [`FetchError::Timeout`] - no complete response within `limits.timeout`
/// - [`FetchError::Network`] - connection or TLS errors
/// - [`FetchError::HttpStatus`] - non-2xx response
/// - [`FetchError::TooLarge`] - body exceeded `limits.max_bytes`
/// - [`FetchError::IncompleteResponse`] - body shorter than Content-Length
/// - [`FetchError::Parse`] - not RSS or Atom
pub async fn fetch_url(
    client: &reqwest::Client,
    url: &Url,
    limits: &FetchLimits,
) -> Result<Vec<Entry>, FetchError> {
    let bytes = tokio::time::timeout(limits.timeout, fetch_bytes(client, url, limits.max_bytes))
        .await
        .map_err(|_| FetchError::Timeout(limits.timeout))??;

    tracing::debug!(url = %url, bytes = bytes.len(), "Fetched feed");
    parse(&bytes)
}

/// Reads a feed document from disk and parses it.
pub async fn read_local(path: &Path, limits: &FetchLimits) -> Result<Vec<Entry>, FetchError> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > limits.max_bytes as u64 {
        return Err(FetchError::TooLarge(limits.max_bytes));
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read local feed");
    parse(&bytes)
}

async fn fetch_bytes(
    client: &reqwest::Client,
    url: &Url,
    max_bytes: usize,
) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url.as_str()).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, max_bytes).await
}

fn parse(bytes: &[u8]) -> Result<Vec<Entry>, FetchError> {
    parse_feed(bytes).map_err(|e| FetchError::Parse(e.to_string()))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Capture Content-Length for completeness check
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::TooLarge(limit));
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

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <item><guid>1</guid><title>Test</title></item>
</channel></rss>"#;

    fn feed_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/feed", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let entries = fetch_url(&client, &feed_url(&mock_server), &FetchLimits::default())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Test");
    }

    #[tokio::test]
    async fn test_fetch_404_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_url(&client, &feed_url(&mock_server), &FetchLimits::default()).await;
        match result.unwrap_err() {
            FetchError::HttpStatus(404) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fetch_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_url(&client, &feed_url(&mock_server), &FetchLimits::default()).await;
        assert!(matches!(result, Err(FetchError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_malformed_feed_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not valid xml"))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_url(&client, &feed_url(&mock_server), &FetchLimits::default()).await;
        match result.unwrap_err() {
            FetchError::Parse(_) => {}
            e => panic!("Expected Parse error, got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_oversized_response_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let limits = FetchLimits {
            max_bytes: 16,
            ..FetchLimits::default()
        };
        let result = fetch_url(&client, &feed_url(&mock_server), &limits).await;
        assert!(matches!(result, Err(FetchError::TooLarge(16))));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::new();
        let limits = FetchLimits {
            timeout: Duration::from_millis(200),
            ..FetchLimits::default()
        };
        let result = fetch_url(&client, &feed_url(&mock_server), &limits).await;
        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_read_local_file() {
        let dir = std::env::temp_dir().join("darling_fetcher_test_local");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("feed.xml");
        std::fs::write(&file, VALID_RSS).unwrap();

        let entries = read_local(&file, &FetchLimits::default()).await.unwrap();
        assert_eq!(entries.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_read_local_missing_file() {
        let result = read_local(
            Path::new("/definitely/not/here/feed.xml"),
            &FetchLimits::default(),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_dispatches_local() {
        let dir = std::env::temp_dir().join("darling_fetcher_test_load");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("feed.xml");
        std::fs::write(&file, VALID_RSS).unwrap();

        let client = reqwest::Client::new();
        let entries = load(&client, &Source::Local(file), &FetchLimits::default())
            .await
            .unwrap();
        assert_eq!(entries[0].id, "1");

        std::fs::remove_dir_all(&dir).ok();
    }
}
