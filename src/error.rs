//! Error types for resource collection access.
//!
//! This module provides a single error type covering transport failures,
//! server rejections, iteration termination and page consistency errors.
//! There is no variant for a 404 on the request path: the executor reports
//! it as a [`Response`](crate::client::Response) without a payload.

use reqwest::{Method, Url};
use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for resource operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all resource operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// A request failed for good, after any retries it was entitled to
    #[error("{method} {url} failed: {source}")]
    RequestExecution {
        /// Method of the failed request
        method: Method,
        /// URL of the failed request
        url: Url,
        /// The failure of the last attempt
        #[source]
        source: Box<Error>,
    },

    /// A payload was required but the resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// `next()` was called with no resources left
    #[error("No more resources in the collection")]
    IterationExhausted,

    /// An index outside the items a page actually holds
    #[error("Page {page} holds {len} resources; index {index} does not exist")]
    PageResourceDoesNotExist {
        /// The requested index
        index: usize,
        /// The page number
        page: u32,
        /// Number of items the page holds
        len: usize,
    },

    /// A single resource was expected but the collection is empty
    #[error("Expected a single resource but the collection is empty")]
    NoResources,

    /// A single resource was expected but the collection holds more
    #[error("Expected a single resource but the collection holds more than one")]
    MultipleResources,

    /// Credentials could not be turned into an authorization header
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A resource reference not in `owner:name` form
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if a request failing with this error may be retried
    /// when the server statuses in `retry_statuses` count as transient.
    ///
    /// Transport failures are always retryable. An error that already wraps
    /// a finished request is not.
    ///
    /// # Example
    ///
    /// ```
    /// use resource_pager::client::DEFAULT_RETRY_STATUSES;
    /// use resource_pager::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable(&DEFAULT_RETRY_STATUSES) {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self, retry_statuses: &[u16]) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => retry_statuses.contains(status),
            _ => false,
        }
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns `true` if iteration ended normally.
    pub fn is_iteration_exhausted(&self) -> bool {
        matches!(self, Error::IterationExhausted)
    }

    /// Returns `true` if a page could not satisfy an index request.
    pub fn is_malformed_page(&self) -> bool {
        matches!(self, Error::PageResourceDoesNotExist { .. })
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::RequestExecution { source, .. } => source.is_client_error(),
            Error::InvalidInput(_) | Error::InvalidReference(_) | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            Error::RequestExecution { source, .. } => source.is_server_error(),
            _ => false,
        }
    }

    /// The HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            Error::RequestExecution { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Wrap the failure of a request together with the request context.
    pub(crate) fn request_execution(method: Method, url: Url, cause: Error) -> Self {
        Error::RequestExecution {
            method,
            url,
            source: Box::new(cause),
        }
    }

    /// Create an API error from a response
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .or_else(|| body.get("message"))
            .and_then(|m| m.as_str())
            .or_else(|| body.as_str())
            .unwrap_or("Unknown API error")
            .to_string();

        Error::Api {
            status,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let statuses = [429, 503];
        assert!(Error::from_api_response(503, Value::Null).is_retryable(&statuses));
        assert!(Error::from_api_response(429, Value::Null).is_retryable(&statuses));
        assert!(!Error::from_api_response(500, Value::Null).is_retryable(&statuses));
        assert!(!Error::from_api_response(400, Value::Null).is_retryable(&statuses));
        assert!(!Error::InvalidInput("bad".into()).is_retryable(&statuses));
        assert!(!Error::IterationExhausted.is_retryable(&statuses));

        let finished = Error::request_execution(
            reqwest::Method::GET,
            reqwest::Url::parse("http://localhost/c").unwrap(),
            Error::from_api_response(503, Value::Null),
        );
        assert!(!finished.is_retryable(&statuses));
    }

    #[test]
    fn test_error_kinds() {
        assert!(Error::IterationExhausted.is_iteration_exhausted());
        assert!(Error::NotFound("x".into()).is_not_found());
        assert!(Error::PageResourceDoesNotExist {
            index: 3,
            page: 1,
            len: 2
        }
        .is_malformed_page());
    }

    #[test]
    fn test_from_api_response() {
        let body = serde_json::json!({
            "error": {
                "message": "Owner does not exist"
            }
        });

        let err = Error::from_api_response(400, body);
        match err {
            Error::Api {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Owner does not exist");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_from_api_response_flat_message() {
        let body = serde_json::json!({ "statusCode": 409, "message": "Version mismatch" });
        match Error::from_api_response(409, body) {
            Error::Api { message, .. } => assert_eq!(message, "Version mismatch"),
            _ => panic!("Expected Api error"),
        }

        match Error::from_api_response(502, Value::String("Bad Gateway".into())) {
            Error::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_request_execution_context() {
        let url = Url::parse("https://example.com/data/contents?page=2").unwrap();
        let err = Error::request_execution(
            Method::GET,
            url,
            Error::from_api_response(500, Value::Null),
        );

        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert_eq!(err.status(), Some(500));
        let rendered = err.to_string();
        assert!(rendered.starts_with("GET https://example.com/data/contents?page=2 failed"));
    }
}
