use thiserror::Error;
use url::Url;

/// Errors that can occur when reading a token as a remote feed URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The string could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Parses a string as a fetchable feed URL.
///
/// Only `http` and `https` are accepted. Unlike a browser, no scheme is
/// guessed: `example.com/feed` is not a URL here and falls through to path
/// handling in the caller.
///
/// # Examples
///
/// ```
/// use darling::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("feeds/local.xml").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
