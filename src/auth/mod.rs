//! Credentials for outgoing requests.
//!
//! Every request the executor sends, retries included, asks a
//! [`CredentialProvider`] for its `Authorization` header. How tokens are
//! obtained or refreshed is up to the provider.
//!
//! ```no_run
//! use resource_pager::{ClientConfig, ResourceClient};
//! use resource_pager::auth::BearerToken;
//!
//! # fn example() -> resource_pager::Result<()> {
//! let client = ResourceClient::with_credentials(
//!     ClientConfig::default(),
//!     BearerToken::new(std::env::var("ACCESS_TOKEN").unwrap()),
//! )?;
//! # Ok(())
//! # }
//! ```

mod credentials;

pub use credentials::{BearerToken, CredentialProvider};
