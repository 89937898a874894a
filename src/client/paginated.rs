//! Lazy iteration over paginated resource collections.
//!
//! A [`ResourceIterator`] walks a collection one resource at a time. Pages
//! are fetched only when the cursor moves past the pages already cached, and
//! every fetched page stays cached for the life of the iterator.
//!
//! # Page boundaries
//!
//! A page holding exactly `perPage` items whose `meta.next` is set may be
//! followed by more resources, or by an empty page. [`ResourceIterator::has_next`]
//! settles this by fetching the next page right away, so a trailing empty
//! page ends iteration cleanly instead of surfacing from `next()`. That fetch
//! goes through the request executor like any other, retries included.
//!
//! # Concurrency
//!
//! An iterator is driven by one task at a time (`has_next` and `next` take
//! `&mut self`). Independent iterators over the same endpoint share nothing
//! but the executor.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::BoxFuture;
use futures_util::Stream;
use serde_json::Value;

use super::cache::PageCache;
use super::{RequestExecutor, ResourceDeserializer, Response};
use crate::api::PageableEndpoint;
use crate::models::{Meta, Page, Resource, FIRST_PAGE};
use crate::{Error, Result};

/// Fetches the raw response for a page number.
pub type FetchPage =
    Box<dyn Fn(u32) -> BoxFuture<'static, Result<Response<Value>>> + Send + Sync>;

/// Lifecycle of a [`ResourceIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// No page loaded yet.
    Initial,
    /// Serving resources from the cache, fetching as needed.
    Active,
    /// No resources left. Terminal.
    Exhausted,
    /// A fetch failed. Terminal.
    Failed,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    /// Number of the page the cursor is on.
    page: u32,
    /// Offset within that page.
    offset: usize,
    /// Resources handed out so far.
    position: usize,
}

struct Paging<T> {
    cache: PageCache<T>,
    cursor: Cursor,
    total_count: Option<u64>,
}

impl<T> Paging<T> {
    fn new() -> Self {
        Self {
            cache: PageCache::new(),
            cursor: Cursor::default(),
            total_count: None,
        }
    }

    fn current(&self) -> Option<&Page<T>> {
        self.cache.get(self.cursor.page)
    }

    fn cursor_in_page(&self) -> bool {
        self.current()
            .is_some_and(|page| page.contains_offset(self.cursor.offset))
    }

    fn move_to(&mut self, page: u32) {
        self.cursor.page = page;
        self.cursor.offset = 0;
    }
}

struct PageLoader<T> {
    fetch_page: FetchPage,
    deserializer: ResourceDeserializer<T>,
}

impl<T: Resource> PageLoader<T> {
    async fn load(&self, number: u32) -> Result<Page<T>> {
        let response = (self.fetch_page)(number).await?;

        let started = Instant::now();
        let page = match response.payload() {
            Some(payload) => self.deserializer.page_from(payload)?,
            None => {
                tracing::debug!(
                    "Page {} came back without payload ({}); treating it as empty",
                    number,
                    response.status()
                );
                Page::new(
                    Meta {
                        page: number,
                        ..Meta::empty(0)
                    },
                    Vec::new(),
                )
            }
        };
        tracing::debug!(
            "Processed page {} with {} resources in {:?}",
            page.number(),
            page.len(),
            started.elapsed()
        );

        Ok(page)
    }
}

/// How an iterator moves between pages.
trait PageTraversal<T>: Send + Sync {
    /// Whether the page under the cursor holds anything at all.
    fn current_page_has_contents(&self, paging: &Paging<T>) -> bool;

    /// Whether the cursor addresses a resource after a page change.
    fn next_page_contains_resources(&self, paging: &Paging<T>) -> bool;

    /// Bring the page after the current one into the cache and move the
    /// cursor to its start.
    fn load_next_and_update_indexes<'a>(
        &'a self,
        paging: &'a mut Paging<T>,
        loader: &'a PageLoader<T>,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Collections spread over numbered pages.
struct PagedTraversal;

impl<T: Resource> PageTraversal<T> for PagedTraversal {
    fn current_page_has_contents(&self, paging: &Paging<T>) -> bool {
        paging.current().is_some_and(|page| !page.is_empty())
    }

    fn next_page_contains_resources(&self, paging: &Paging<T>) -> bool {
        paging.cursor_in_page()
    }

    fn load_next_and_update_indexes<'a>(
        &'a self,
        paging: &'a mut Paging<T>,
        loader: &'a PageLoader<T>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let Some(current) = paging.current() else {
                return Ok(());
            };
            if !current.meta().has_next() {
                return Ok(());
            }
            let target = current.number().saturating_add(1);

            if paging.cache.contains(target) {
                paging.move_to(target);
                return Ok(());
            }

            let page = loader.load(target).await?;
            let reported = page.number();
            if paging.total_count.is_none() {
                paging.total_count = page.meta().total_count;
            }
            if !paging.cache.insert(page) {
                tracing::warn!(
                    "Requested page {} but got page {} again; ending iteration",
                    target,
                    reported
                );
                return Ok(());
            }
            if reported != target {
                tracing::warn!(
                    "Requested page {} but the server reported page {}",
                    target,
                    reported
                );
            }
            paging.move_to(reported);
            Ok::<_, Error>(())
        })
    }
}

/// Responses without pagination metadata: one page, nothing after it.
struct SingleTraversal;

impl<T: Resource> PageTraversal<T> for SingleTraversal {
    fn current_page_has_contents(&self, paging: &Paging<T>) -> bool {
        paging.current().is_some_and(|page| !page.is_empty())
    }

    fn next_page_contains_resources(&self, _paging: &Paging<T>) -> bool {
        false
    }

    fn load_next_and_update_indexes<'a>(
        &'a self,
        _paging: &'a mut Paging<T>,
        _loader: &'a PageLoader<T>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Ok::<_, Error>(()) })
    }
}

/// A lazy, cached sequence of resources backed by a paginated endpoint.
///
/// # Example
///
/// ```no_run
/// use resource_pager::{ClientConfig, ResourceClient};
///
/// # async fn example() -> resource_pager::Result<()> {
/// let client = ResourceClient::new(ClientConfig::default())?;
/// let contents = client.endpoint::<serde_json::Value>(
///     "https://data.example.com/data/contents",
///     "contents",
/// )?;
///
/// let mut iter = contents.browse();
/// while iter.has_next().await? {
///     let content = iter.next().await?;
///     println!("{}", content);
/// }
/// println!("server declared {:?} contents", iter.total_count());
/// # Ok(())
/// # }
/// ```
pub struct ResourceIterator<T> {
    state: IteratorState,
    paging: Paging<T>,
    loader: PageLoader<T>,
    traversal: Box<dyn PageTraversal<T>>,
}

impl<T: Resource> ResourceIterator<T> {
    /// Create an iterator that fetches page 1 on first use.
    pub fn new<F>(deserializer: ResourceDeserializer<T>, fetch_page: F) -> Self
    where
        F: Fn(u32) -> BoxFuture<'static, Result<Response<Value>>> + Send + Sync + 'static,
    {
        Self {
            state: IteratorState::Initial,
            paging: Paging::new(),
            loader: PageLoader {
                fetch_page: Box::new(fetch_page),
                deserializer,
            },
            traversal: Box::new(PagedTraversal),
        }
    }

    /// Create an iterator seeded with an already-fetched payload.
    ///
    /// A payload without `meta` is a single page with nothing after it.
    pub fn from_payload<F>(
        payload: &Value,
        deserializer: ResourceDeserializer<T>,
        fetch_page: F,
    ) -> Result<Self>
    where
        F: Fn(u32) -> BoxFuture<'static, Result<Response<Value>>> + Send + Sync + 'static,
    {
        let paged = deserializer.meta_from(payload)?.is_some();
        let page = deserializer.page_from(payload)?;

        let mut iter = Self::new(deserializer, fetch_page);
        if !paged {
            iter.traversal = Box::new(SingleTraversal);
        }
        iter.seed(page);
        Ok(iter)
    }

    /// Create an iterator fetching pages from `endpoint` through `executor`.
    pub fn for_endpoint(
        endpoint: Arc<dyn PageableEndpoint>,
        executor: Arc<RequestExecutor>,
    ) -> Self {
        let deserializer = ResourceDeserializer::new(endpoint.resource_key());
        Self::new(deserializer, fetch_through(endpoint, executor))
    }

    /// Like [`for_endpoint`](Self::for_endpoint), seeded with a payload
    /// already fetched from it.
    pub fn for_endpoint_from_payload(
        payload: &Value,
        endpoint: Arc<dyn PageableEndpoint>,
        executor: Arc<RequestExecutor>,
    ) -> Result<Self> {
        let deserializer = ResourceDeserializer::new(endpoint.resource_key());
        Self::from_payload(payload, deserializer, fetch_through(endpoint, executor))
    }

    /// Returns `true` if another resource is available.
    ///
    /// At a full page boundary this fetches the next page (once) to confirm
    /// it is not empty. A failed fetch moves the iterator to
    /// [`IteratorState::Failed`] and returns the error.
    pub async fn has_next(&mut self) -> Result<bool> {
        match self.state {
            IteratorState::Exhausted | IteratorState::Failed => return Ok(false),
            IteratorState::Initial => self.load_first_page().await?,
            IteratorState::Active => {}
        }

        if !self.traversal.current_page_has_contents(&self.paging) {
            return Ok(self.exhaust());
        }
        if self.paging.cursor_in_page() {
            return Ok(true);
        }
        if !self.paging.current().is_some_and(|page| page.is_not_last()) {
            return Ok(self.exhaust());
        }

        if let Err(err) = self
            .traversal
            .load_next_and_update_indexes(&mut self.paging, &self.loader)
            .await
        {
            self.state = IteratorState::Failed;
            return Err(err);
        }

        if self.traversal.next_page_contains_resources(&self.paging) {
            Ok(true)
        } else {
            Ok(self.exhaust())
        }
    }

    /// Return the resource under the cursor and advance.
    ///
    /// Fails with [`Error::IterationExhausted`] when nothing is left.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Result<T> {
        if !self.has_next().await? {
            return Err(Error::IterationExhausted);
        }

        let Cursor { page, offset, .. } = self.paging.cursor;
        let item = match self.paging.cache.get(page).map(|p| p.get(offset)) {
            Some(Ok(item)) => item.clone(),
            Some(Err(err)) => {
                self.state = IteratorState::Failed;
                return Err(err);
            }
            None => {
                self.state = IteratorState::Failed;
                return Err(Error::PageResourceDoesNotExist {
                    index: offset,
                    page,
                    len: 0,
                });
            }
        };

        self.paging.cursor.offset += 1;
        self.paging.cursor.position += 1;
        Ok(item)
    }

    /// Return the only remaining resource.
    ///
    /// Fails with [`Error::NoResources`] or [`Error::MultipleResources`]
    /// unless exactly one resource is left.
    pub async fn single(&mut self) -> Result<T> {
        if !self.has_next().await? {
            return Err(Error::NoResources);
        }
        let item = self.next().await?;
        if self.has_next().await? {
            return Err(Error::MultipleResources);
        }
        Ok(item)
    }

    /// Drain the remaining resources into a vector.
    pub async fn collect_remaining(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while self.has_next().await? {
            items.push(self.next().await?);
        }
        Ok(items)
    }

    /// Turn the iterator into a [`Stream`] of the remaining resources.
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + Send {
        futures_util::stream::try_unfold(self, |mut iter| async move {
            if !iter.has_next().await? {
                return Ok(None);
            }
            let item = iter.next().await?;
            Ok::<_, Error>(Some((item, iter)))
        })
    }

    async fn load_first_page(&mut self) -> Result<()> {
        match self.loader.load(FIRST_PAGE).await {
            Ok(page) => {
                self.seed(page);
                Ok(())
            }
            Err(err) => {
                self.state = IteratorState::Failed;
                Err(err)
            }
        }
    }

    fn seed(&mut self, page: Page<T>) {
        self.paging.total_count = page.meta().total_count;
        self.paging.move_to(page.number());
        self.paging.cache.insert(page);
        self.state = IteratorState::Active;
    }

    fn exhaust(&mut self) -> bool {
        self.state = IteratorState::Exhausted;
        false
    }
}

impl<T> ResourceIterator<T> {
    /// The total declared by the server, if it declared one.
    pub fn total_count(&self) -> Option<u64> {
        self.paging.total_count
    }

    /// The current lifecycle state.
    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Number of resources returned so far.
    pub fn position(&self) -> usize {
        self.paging.cursor.position
    }

    /// Number of pages fetched and cached.
    pub fn cached_pages(&self) -> usize {
        self.paging.cache.len()
    }

    /// The key the resources are stored under in each payload.
    pub fn resource_key(&self) -> &str {
        self.loader.deserializer.resource_key()
    }
}

impl<T> std::fmt::Debug for ResourceIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceIterator")
            .field("state", &self.state)
            .field("cursor", &self.paging.cursor)
            .field("total_count", &self.paging.total_count)
            .field("cached_pages", &self.paging.cache.len())
            .finish()
    }
}

fn fetch_through(
    endpoint: Arc<dyn PageableEndpoint>,
    executor: Arc<RequestExecutor>,
) -> FetchPage {
    Box::new(
        move |page: u32| -> BoxFuture<'static, Result<Response<Value>>> {
            let endpoint = endpoint.clone();
            let executor = executor.clone();
            Box::pin(async move {
                let request = endpoint.page_request(page)?;
                executor.execute(request).await
            })
        },
    )
}
