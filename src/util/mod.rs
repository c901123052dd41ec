//! Utility functions shared by the resolver and the serializer.
//!
//! - **URL validation**: deciding whether a token names a remote feed
//! - **Text cleanup**: dropping characters XML cannot carry

mod text;
mod url_validator;

pub use text::strip_xml_invalid_chars;
pub use url_validator::{validate_url, UrlValidationError};
