//! The client shared by all endpoints.

use std::sync::Arc;

use reqwest::Url;

use super::config::ClientConfig;
use super::RequestExecutor;
use crate::api::ResourceEndpoint;
use crate::auth::CredentialProvider;
use crate::models::Resource;
use crate::{Error, Result};

/// Entry point for accessing resource collections.
///
/// The client resolves its configuration once, builds one
/// [`RequestExecutor`] and hands it to every endpoint it creates. Cloning the
/// client is cheap and shares that executor.
///
/// # Example
///
/// ```no_run
/// use resource_pager::{ClientConfig, ResourceClient};
/// use resource_pager::auth::BearerToken;
///
/// # async fn example() -> resource_pager::Result<()> {
/// let client = ResourceClient::with_credentials(
///     ClientConfig::default().with_page_size(50),
///     BearerToken::new("access-token"),
/// )?;
///
/// let contents = client.endpoint::<serde_json::Value>(
///     "https://data.example.com/data/contents",
///     "contents",
/// )?;
/// let first = contents.browse().next().await?;
/// # Ok(())
/// # }
/// ```
pub struct ResourceClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) executor: Arc<RequestExecutor>,
    pub(crate) config: ClientConfig,
}

impl ResourceClient {
    /// Create a client sending unauthenticated requests.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client that authorizes every request with `credentials`.
    pub fn with_credentials(
        config: ClientConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Result<Self> {
        Self::build(config, Some(Arc::new(credentials)))
    }

    fn build(
        config: ClientConfig,
        credentials: Option<Arc<dyn CredentialProvider>>,
    ) -> Result<Self> {
        if config.page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let strategy = config.recovery_strategy();
        tracing::debug!("Resolved recovery strategy: {:?}", strategy);

        let mut executor = RequestExecutor::new(http, strategy)
            .with_retry_statuses(config.retry_statuses.clone());
        if let Some(credentials) = credentials {
            executor = executor.with_credentials(credentials);
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                executor: Arc::new(executor),
                config,
            }),
        })
    }

    /// Get an endpoint for the collection at `url` whose items are stored
    /// under `resource_key`.
    pub fn endpoint<T: Resource>(
        &self,
        url: &str,
        resource_key: impl Into<String>,
    ) -> Result<ResourceEndpoint<T>> {
        let url = Url::parse(url)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!(
                "{} cannot be used as a collection URL",
                url
            )));
        }

        Ok(ResourceEndpoint::new(
            self.inner.executor.clone(),
            url,
            resource_key,
            self.inner.config.page_size,
        ))
    }

    /// The shared request executor.
    pub fn executor(&self) -> Arc<RequestExecutor> {
        self.inner.executor.clone()
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl Clone for ResourceClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("config", &self.inner.config)
            .field("executor", &self.inner.executor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Backoff, RecoveryStrategy};

    #[test]
    fn test_client_resolves_strategy_once() {
        let client = ResourceClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.executor().strategy(),
            &RecoveryStrategy::new(Backoff::Zero, 10)
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = ResourceClient::new(ClientConfig::default().with_page_size(0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_endpoint_url_validation() {
        let client = ResourceClient::new(ClientConfig::default()).unwrap();
        assert!(client
            .endpoint::<serde_json::Value>("not a url", "contents")
            .is_err());
        assert!(client
            .endpoint::<serde_json::Value>("mailto:someone@example.com", "contents")
            .is_err());
        assert!(client
            .endpoint::<serde_json::Value>("https://example.com/data/contents", "contents")
            .is_ok());
    }
}
