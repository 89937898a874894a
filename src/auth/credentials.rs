//! Authorization header providers.

use futures_util::future::BoxFuture;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Supplies the `Authorization` header for outgoing requests.
///
/// The executor asks for a header before every attempt, retries included,
/// so implementations that refresh tokens always hand out a current one.
/// Acquiring and refreshing tokens is up to the implementation.
pub trait CredentialProvider: Send + Sync {
    /// The `Authorization` header value for the next request.
    fn authorization(&self) -> BoxFuture<'_, Result<HeaderValue>>;
}

/// A fixed bearer token.
///
/// # Example
///
/// ```
/// use resource_pager::auth::BearerToken;
///
/// let token = BearerToken::new("eyJhbGciOi...");
/// assert!(!format!("{:?}", token).contains("eyJhbGciOi"));
/// ```
pub struct BearerToken {
    token: SecretString,
}

impl BearerToken {
    /// Wrap an access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    fn header_value(&self) -> Result<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                .map_err(|_| Error::Authentication("Invalid token format".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl CredentialProvider for BearerToken {
    fn authorization(&self) -> BoxFuture<'_, Result<HeaderValue>> {
        Box::pin(async move { self.header_value() })
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_debug_redacts_token() {
        let debug_str = format!("{:?}", BearerToken::new("super-secret-token"));

        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_bearer_token_header() {
        let value = BearerToken::new("abc").authorization().await.unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[tokio::test]
    async fn test_bearer_token_rejects_control_characters() {
        let err = BearerToken::new("abc\ndef").authorization().await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
