//! Error types for the search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Non-200 responses, empty pages and missing instant answers are not
/// errors; strategies report them as empty results instead.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed (connection, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a selector or document.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let err = SearchError::Parse("invalid selector".to_string());
        assert_eq!(err.to_string(), "Failed to parse response: invalid selector");
    }

    #[test]
    fn test_error_display_invalid_query() {
        let err = SearchError::InvalidQuery("empty query".to_string());
        assert_eq!(err.to_string(), "Invalid query: empty query");
    }

    #[test]
    fn test_error_display_other() {
        let err = SearchError::Other("something went wrong".to_string());
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: SearchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, SearchError::UrlParse(_)));
        assert!(err.to_string().starts_with("URL parsing error"));
    }
}
