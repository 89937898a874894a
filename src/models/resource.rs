//! The resource abstraction shared by every collection.

use serde::de::DeserializeOwned;

use super::{Reference, Version};

/// A typed entity returned by a collection endpoint.
///
/// Iteration only needs resources to be deserializable and cloneable.
/// Identity and version are needed for conditional writes through
/// [`ResourceEndpoint::update`](crate::api::ResourceEndpoint::update).
///
/// # Example
///
/// ```
/// use resource_pager::{Reference, Resource, Version};
///
/// #[derive(Debug, Clone, serde::Deserialize)]
/// struct Content {
///     owner: String,
///     name: String,
///     version: Option<String>,
/// }
///
/// impl Resource for Content {
///     fn reference(&self) -> Option<Reference> {
///         Some(Reference::new(&self.owner, &self.name))
///     }
///
///     fn version(&self) -> Option<Version> {
///         self.version.as_deref().map(Version::from)
///     }
/// }
/// ```
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// The `owner:name` reference identifying this resource.
    fn reference(&self) -> Option<Reference> {
        None
    }

    /// The version token last seen for this resource.
    fn version(&self) -> Option<Version> {
        None
    }
}

impl Resource for serde_json::Value {}
