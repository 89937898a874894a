//! The outcome of an executed request.

use reqwest::StatusCode;

use crate::{Error, Result};

/// Status and optional payload of a completed request.
///
/// A request that reached the server and came back either successful or
/// "not found" yields a `Response`. Not found is never an error: it shows up
/// as [`is_not_found`](Self::is_not_found) with no payload, so existence
/// checks resolve without an `Err`. Every other failure is an
/// [`Error::RequestExecution`](crate::Error::RequestExecution).
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    status: StatusCode,
    payload: Option<T>,
}

impl<T> Response<T> {
    /// Create a response.
    pub fn new(status: StatusCode, payload: Option<T>) -> Self {
        Self { status, payload }
    }

    /// A successful response carrying `payload`.
    pub fn ok(payload: T) -> Self {
        Self::new(StatusCode::OK, Some(payload))
    }

    /// A not-found response.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, None)
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// The payload, if one was returned.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Consume the response, returning the payload if one was returned.
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// Consume the response, failing with [`Error::NotFound`] when no
    /// payload was returned.
    pub fn require_payload(self, what: impl Into<String>) -> Result<T> {
        self.payload.ok_or_else(|| Error::NotFound(what.into()))
    }

    /// Transform the payload, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            payload: self.payload.map(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_response() {
        let response: Response<u8> = Response::not_found();
        assert!(!response.is_success());
        assert!(response.is_not_found());
        assert!(response.payload().is_none());
        assert!(response.require_payload("demo:x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_success_response() {
        let response = Response::ok(21).map(|v| v * 2);
        assert!(response.is_success());
        assert_eq!(response.payload(), Some(&42));
        assert_eq!(response.into_payload(), Some(42));
    }

    #[test]
    fn test_success_without_payload() {
        let response: Response<u8> = Response::new(StatusCode::NO_CONTENT, None);
        assert!(response.is_success());
        assert!(!response.is_not_found());
        assert_eq!(response.into_payload(), None);
    }
}
