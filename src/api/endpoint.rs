//! Collection endpoints.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde_json::Value;

use crate::client::{RequestExecutor, ResourceDeserializer, ResourceIterator, Response};
use crate::models::{Reference, Resource};
use crate::{Error, Result};

const APPLICATION_JSON: &str = "application/json";

/// Builds the request for one page of a collection.
///
/// Implement this to plug a collection with its own URL layout or query
/// parameters into [`ResourceIterator::for_endpoint`].
pub trait PageableEndpoint: Send + Sync {
    /// The key the items are stored under in each payload.
    fn resource_key(&self) -> &str;

    /// The request fetching page `page`.
    fn page_request(&self, page: u32) -> Result<Request>;
}

/// A collection at a fixed URL, paged with `page` and `perPage` query
/// parameters and addressed per resource as `<url>/<owner:name>`.
///
/// Iterators returned by [`read_many`](Self::read_many) page through the
/// reference query `<url>/<ref1>,<ref2>`, not through the whole collection.
///
/// # Example
///
/// ```no_run
/// use resource_pager::{ClientConfig, Reference, ResourceClient};
///
/// # async fn example() -> resource_pager::Result<()> {
/// let client = ResourceClient::new(ClientConfig::default())?;
/// let contents = client.endpoint::<serde_json::Value>(
///     "https://data.example.com/data/contents",
///     "contents",
/// )?;
///
/// match contents.read(&Reference::new("demo", "intro")).await? {
///     Some(content) => println!("found {}", content),
///     None => println!("no such content"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct ResourceEndpoint<T> {
    executor: Arc<RequestExecutor>,
    url: Url,
    resource_key: String,
    page_size: u32,
    /// Path segment appended to `url` for page requests.
    scope: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceEndpoint<T> {
    pub(crate) fn new(
        executor: Arc<RequestExecutor>,
        url: Url,
        resource_key: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            executor,
            url,
            resource_key: resource_key.into(),
            page_size,
            scope: None,
            _marker: PhantomData,
        }
    }

    /// Set the number of resources requested per page.
    ///
    /// Fails with [`Error::Config`] for a page size of zero.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// The collection URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The number of resources requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// A deserializer for this collection's payloads.
    pub fn deserializer(&self) -> ResourceDeserializer<T> {
        ResourceDeserializer::new(&self.resource_key)
    }

    /// Iterate over the whole collection, fetching page 1 on first use.
    pub fn browse(&self) -> ResourceIterator<T> {
        ResourceIterator::for_endpoint(Arc::new(self.clone()), self.executor.clone())
    }

    /// Iterate over the collection starting from an already-fetched payload.
    pub fn browse_from(&self, payload: &Value) -> Result<ResourceIterator<T>> {
        ResourceIterator::for_endpoint_from_payload(
            payload,
            Arc::new(self.clone()),
            self.executor.clone(),
        )
    }

    /// Read one resource. A resource that does not exist yields `Ok(None)`.
    pub async fn read(&self, reference: &Reference) -> Result<Option<T>> {
        let request = self.request(Method::GET, Some(&reference.to_string()))?;
        let response = self.executor.execute(request).await?;

        match response.into_payload() {
            Some(payload) => Ok(self
                .deserializer()
                .contents_from(&payload)?
                .into_iter()
                .next()),
            None => Ok(None),
        }
    }

    /// Read several resources in one request.
    ///
    /// References that do not exist are simply missing from the result; if
    /// none exists the iterator is empty.
    pub async fn read_many(&self, references: &[Reference]) -> Result<ResourceIterator<T>> {
        if references.is_empty() {
            return Err(Error::InvalidInput("no references given".to_string()));
        }

        let scoped = self.scoped(Reference::join(references));
        let request = scoped.request(Method::GET, scoped.scope.as_deref())?;
        let payload = scoped
            .executor
            .execute(request)
            .await?
            .into_payload()
            .unwrap_or_else(|| Value::Object(Default::default()));
        scoped.browse_from(&payload)
    }

    fn scoped(&self, segment: String) -> Self {
        Self {
            scope: Some(segment),
            ..self.clone()
        }
    }

    /// Delete resources.
    pub async fn delete(&self, references: &[Reference]) -> Result<Response<Value>> {
        if references.is_empty() {
            return Err(Error::InvalidInput("no references given".to_string()));
        }

        let request = self.request(Method::DELETE, Some(&Reference::join(references)))?;
        self.executor.execute(request).await
    }
}

impl<T: Resource + Serialize> ResourceEndpoint<T> {
    /// Create resources.
    pub async fn store(&self, resources: &[T]) -> Result<Response<Value>> {
        let mut request = self.request(Method::POST, None)?;
        self.set_body(&mut request, resources)?;
        self.executor.execute(request).await
    }

    /// Replace a resource, provided nobody changed it since `resource` was
    /// read.
    ///
    /// The resource's version goes out as an `If-Match` precondition. A
    /// resource without reference or version is rejected before sending.
    pub async fn update(&self, resource: &T) -> Result<Response<Value>> {
        let reference = resource.reference().ok_or_else(|| {
            Error::InvalidInput("resource has no reference to update".to_string())
        })?;
        let version = resource.version().ok_or_else(|| {
            Error::InvalidInput(format!("resource {} has no version to match", reference))
        })?;

        let mut request = self.request(Method::PUT, Some(&reference.to_string()))?;
        self.set_body(&mut request, std::slice::from_ref(resource))?;
        let if_match = HeaderValue::from_str(&version.if_match_value())
            .map_err(|_| Error::InvalidInput(format!("invalid version {}", version)))?;
        request.headers_mut().insert(IF_MATCH, if_match);

        tracing::debug!("Updating {} at version {}", reference, version);
        self.executor.execute(request).await
    }

    fn set_body(&self, request: &mut Request, resources: &[T]) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(self.resource_key.clone(), serde_json::to_value(resources)?);
        let bytes = serde_json::to_vec(&body)?;
        tracing::debug!("Request body: {}", String::from_utf8_lossy(&bytes));

        *request.body_mut() = Some(bytes.into());
        Ok(())
    }
}

impl<T> ResourceEndpoint<T> {
    fn request(&self, method: Method, segment: Option<&str>) -> Result<Request> {
        let mut url = self.url.clone();
        if let Some(segment) = segment {
            url.path_segments_mut()
                .map_err(|_| {
                    Error::InvalidInput(format!("{} cannot be used as a base URL", self.url))
                })?
                .pop_if_empty()
                .push(segment);
        }

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Ok(request)
    }
}

impl<T: Resource> PageableEndpoint for ResourceEndpoint<T> {
    fn resource_key(&self) -> &str {
        &self.resource_key
    }

    fn page_request(&self, page: u32) -> Result<Request> {
        let mut request = self.request(Method::GET, self.scope.as_deref())?;
        request
            .url_mut()
            .query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("perPage", &self.page_size.to_string());
        Ok(request)
    }
}

impl<T> Clone for ResourceEndpoint<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            url: self.url.clone(),
            resource_key: self.resource_key.clone(),
            page_size: self.page_size,
            scope: self.scope.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ResourceEndpoint<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceEndpoint")
            .field("url", &self.url.as_str())
            .field("resource_key", &self.resource_key)
            .field("page_size", &self.page_size)
            .field("scope", &self.scope)
            .finish()
    }
}
