//! # resource-pager
//!
//! Lazy iteration over paginated JSON resource collections, backed by a
//! request executor that retries transient failures.
//!
//! Collections answer with payloads of the form
//!
//! ```json
//! { "meta": { "page": 1, "perPage": 2, "totalCount": 3, "next": "..." },
//!   "contents": [ { .. }, { .. } ] }
//! ```
//!
//! and a [`ResourceIterator`] walks them one resource at a time, fetching a
//! page only when the previous one is used up and caching every page it has
//! seen.
//!
//! ## Features
//!
//! - **Lazy paging**: pages are requested on demand and fetched at most once
//! - **Single payloads**: payloads without `meta` iterate as one page
//! - **Retries**: transport errors and 429/5xx answers are retried with a
//!   configurable backoff
//! - **Not found is not an error**: a 404 yields a response without payload
//! - **Optimistic updates**: updates carry the resource version as `If-Match`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resource_pager::{ClientConfig, ResourceClient};
//!
//! #[tokio::main]
//! async fn main() -> resource_pager::Result<()> {
//!     let client = ResourceClient::new(ClientConfig::default().with_page_size(50))?;
//!     let contents = client.endpoint::<serde_json::Value>(
//!         "https://data.example.com/data/contents",
//!         "contents",
//!     )?;
//!
//!     let mut iter = contents.browse();
//!     while iter.has_next().await? {
//!         let content = iter.next().await?;
//!         println!("{}", content);
//!     }
//!     println!("{:?} contents in total", iter.total_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! ```rust
//! use std::time::Duration;
//! use resource_pager::{Backoff, ClientConfig, RecoveryConfig};
//!
//! let config = ClientConfig::default().with_recovery(
//!     RecoveryConfig::new(5).with_backoff(Backoff::Fixed(Duration::from_millis(200))),
//! );
//! assert_eq!(config.recovery_strategy().number_of_retries, 5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use api::{PageableEndpoint, ResourceEndpoint};
pub use client::{
    Backoff, ClientConfig, IteratorState, RecoveryConfig, RecoveryStrategy, RequestExecutor,
    ResourceClient, ResourceDeserializer, ResourceIterator, Response,
};
pub use error::{Error, Result};
pub use models::{Meta, Page, Reference, Resource, Version};

/// Prelude module for convenient imports.
///
/// ```rust
/// use resource_pager::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{PageableEndpoint, ResourceEndpoint};
    pub use crate::auth::{BearerToken, CredentialProvider};
    pub use crate::client::{
        Backoff, ClientConfig, IteratorState, RecoveryConfig, RecoveryStrategy,
        RequestExecutor, ResourceClient, ResourceIterator, Response,
    };
    pub use crate::error::{Error, Result};
    pub use crate::models::{Meta, Page, Reference, Resource, Version};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_parsing() {
        let reference: Reference = "demo:intro".parse().unwrap();
        assert_eq!(reference.owner(), "demo");
        assert_eq!(reference.name(), "intro");
        assert!("intro".parse::<Reference>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, client::DEFAULT_PAGE_SIZE);
        assert_eq!(
            config.recovery_strategy(),
            RecoveryStrategy::new(Backoff::Zero, 10)
        );
    }
}
