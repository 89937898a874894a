//! Request execution with retries.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::AUTHORIZATION;
use reqwest::{Request, StatusCode};
use serde_json::Value;

use super::config::{RecoveryStrategy, DEFAULT_RETRY_STATUSES};
use super::Response;
use crate::auth::CredentialProvider;
use crate::{Error, Result};

/// Runs requests under a [`RecoveryStrategy`].
///
/// Transport failures and responses with a retryable status are retried,
/// waiting between attempts as the strategy's backoff dictates. A 404 comes
/// back as an `Ok` [`Response`] without payload. Anything else that does not
/// succeed, including a retryable failure once the retry budget is spent, is
/// returned as [`Error::RequestExecution`] carrying the request method and URL.
///
/// The executor holds no per-request state and can be shared freely between
/// tasks and iterators.
pub struct RequestExecutor {
    http: reqwest::Client,
    strategy: RecoveryStrategy,
    retry_statuses: Vec<u16>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl RequestExecutor {
    /// Create an executor retrying on 429, 500, 502, 503 and 504.
    pub fn new(http: reqwest::Client, strategy: RecoveryStrategy) -> Self {
        Self {
            http,
            strategy,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            credentials: None,
        }
    }

    /// Set the HTTP status codes that are retried.
    pub fn with_retry_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.retry_statuses = statuses;
        self
    }

    /// Attach an `Authorization` header to every attempt.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The underlying HTTP client, for building requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The strategy this executor retries with.
    pub fn strategy(&self) -> &RecoveryStrategy {
        &self.strategy
    }

    /// Execute a request, retrying transient failures.
    pub async fn execute(&self, request: Request) -> Result<Response<Value>> {
        let method = request.method().clone();
        let url = request.url().clone();
        let started = Instant::now();
        let mut retries = 0;

        tracing::debug!("Performing {} request to {}", method, url);

        loop {
            let attempt = request.try_clone().ok_or_else(|| {
                Error::InvalidInput(format!("request body for {} cannot be replayed", url))
            })?;

            let cause = match self.attempt(attempt).await {
                Ok(response) => return Ok(response),
                Err(cause) if cause.is_retryable(&self.retry_statuses) => cause,
                Err(cause) => {
                    tracing::debug!("{} {} failed: {}", method, url, cause);
                    return Err(Error::request_execution(method, url, cause));
                }
            };

            match self.strategy.delay_before_retry(retries, started.elapsed()) {
                Some(delay) => {
                    retries += 1;
                    tracing::warn!(
                        "{} {} failed ({}); retry {}/{} in {:?}",
                        method,
                        url,
                        cause,
                        retries,
                        self.strategy.number_of_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::debug!(
                        "{} {} failed after {} retries: {}",
                        method,
                        url,
                        retries,
                        cause
                    );
                    return Err(Error::request_execution(method, url, cause));
                }
            }
        }
    }

    async fn attempt(&self, mut request: Request) -> Result<Response<Value>> {
        if let Some(credentials) = &self.credentials {
            let value = credentials.authorization().await?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let response = self.http.execute(request).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Response::new(status, None));
        }

        let body = response.text().await?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Response::new(status, None));
            }
            let payload: Value = serde_json::from_str(&body)?;
            tracing::debug!("Parsed {} response: {}", status, payload);
            return Ok(Response::new(status, Some(payload)));
        }

        let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Err(Error::from_api_response(status.as_u16(), body))
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("strategy", &self.strategy)
            .field("retry_statuses", &self.retry_statuses)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::config::Backoff;
    use reqwest::Method;

    fn executor(retries: u32) -> RequestExecutor {
        RequestExecutor::new(
            reqwest::Client::new(),
            RecoveryStrategy::new(Backoff::Zero, retries),
        )
    }

    #[tokio::test]
    async fn test_transport_failure_exhausts_retries() {
        // nothing listens on port 9 of localhost
        let url = reqwest::Url::parse("http://127.0.0.1:9/collection").unwrap();
        let request = Request::new(Method::GET, url.clone());

        let err = executor(2).execute(request).await.unwrap_err();
        match err {
            Error::RequestExecution {
                method,
                url: failed,
                source,
            } => {
                assert_eq!(method, Method::GET);
                assert_eq!(failed, url);
                assert!(matches!(*source, Error::Http(_)));
            }
            other => panic!("Expected RequestExecution, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_credentials() {
        let executor = executor(1).with_credentials(Arc::new(crate::auth::BearerToken::new("t0k3n")));
        let rendered = format!("{:?}", executor);
        assert!(!rendered.contains("t0k3n"));
        assert!(rendered.contains("credentials: true"));
    }
}
