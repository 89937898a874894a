//! Request execution and lazy collection iteration.
//!
//! This module provides the main entry point [`ResourceClient`], the
//! [`RequestExecutor`] it shares between endpoints, and the
//! [`ResourceIterator`] that walks paginated collections.
//!
//! # Example
//!
//! ```no_run
//! use resource_pager::{ClientConfig, ResourceClient};
//!
//! # async fn example() -> resource_pager::Result<()> {
//! let client = ResourceClient::new(ClientConfig::default())?;
//! let contents = client.endpoint::<serde_json::Value>(
//!     "https://data.example.com/data/contents",
//!     "contents",
//! )?;
//!
//! let all = contents.browse().collect_remaining().await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod deserializer;
mod executor;
mod http;
pub mod paginated;
mod response;

pub use config::{
    resolve_recovery_strategy, Backoff, ClientConfig, RecoveryConfig, RecoveryStrategy,
    DEFAULT_PAGE_SIZE, DEFAULT_RETRY_STATUSES,
};
pub use deserializer::ResourceDeserializer;
pub use executor::RequestExecutor;
pub use http::ResourceClient;
pub use paginated::{FetchPage, IteratorState, ResourceIterator};
pub use response::Response;
