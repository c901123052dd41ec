use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::util::validate_url;

/// Where a feed document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An `http`/`https` URL.
    Remote(Url),
    /// A file on disk.
    Local(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{}", url),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A command-line token that is neither a URL nor an existing path.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}: {token}", reason = SourceError::REASON)]
pub struct SourceError {
    pub token: String,
}

impl SourceError {
    pub const REASON: &'static str = "not an http(s) URL or an existing file";
}

/// Classifies one command-line token.
///
/// A token is remote if it parses as an `http`/`https` URL. Otherwise it is
/// local if something exists at that path. When the existence check itself
/// fails (permissions, a broken mount), the token is still taken as local
/// and the real error surfaces when the file is opened.
///
/// # Errors
///
/// Returns [`SourceError`] when the token is neither.
pub fn resolve(token: &str) -> Result<Source, SourceError> {
    if let Ok(url) = validate_url(token) {
        return Ok(Source::Remote(url));
    }

    let path = Path::new(token);
    match path.try_exists() {
        Ok(true) => Ok(Source::Local(path.to_path_buf())),
        Ok(false) => Err(SourceError {
            token: token.to_string(),
        }),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Existence check failed, treating as local");
            Ok(Source::Local(path.to_path_buf()))
        }
    }
}

/// Classifies every token, splitting valid sources from rejected ones.
///
/// Order within each half follows the input.
pub fn resolve_all<S: AsRef<str>>(tokens: &[S]) -> (Vec<Source>, Vec<SourceError>) {
    let mut sources = Vec::with_capacity(tokens.len());
    let mut rejected = Vec::new();
    for token in tokens {
        match resolve(token.as_ref()) {
            Ok(source) => sources.push(source),
            Err(e) => rejected.push(e),
        }
    }
    (sources, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https_are_remote() {
        for token in ["http://example.com/rss", "https://example.com/atom.xml"] {
            match resolve(token).unwrap() {
                Source::Remote(url) => assert_eq!(url.as_str(), token),
                other => panic!("expected Remote, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_existing_file_is_local() {
        let dir = std::env::temp_dir().join("darling_source_test_local");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.xml");
        std::fs::write(&path, "<rss/>").unwrap();

        let token = path.to_str().unwrap();
        assert_eq!(resolve(token).unwrap(), Source::Local(path.clone()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_path_is_invalid() {
        let err = resolve("/definitely/not/here/darling.xml").unwrap_err();
        assert_eq!(err.token, "/definitely/not/here/darling.xml");
    }

    #[test]
    fn test_unsupported_scheme_without_file_is_invalid() {
        assert!(resolve("ftp://example.com/feed").is_err());
        assert!(resolve("gopher://example.com").is_err());
    }

    #[test]
    fn test_resolve_all_splits() {
        let (sources, rejected) = resolve_all(&[
            "https://a.example.com/rss",
            "ftp://nope",
            "https://b.example.com/rss",
        ]);
        assert_eq!(sources.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].token, "ftp://nope");
    }

    #[test]
    fn test_error_message_names_token() {
        let err = SourceError {
            token: "nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            format!("{}: nope", SourceError::REASON)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Source::Local(PathBuf::from("feeds/a.xml")).to_string(),
            "feeds/a.xml"
        );
    }
}
