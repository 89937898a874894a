//! Data models for paginated resource collections.
//!
//! - [`primitives`] - `Reference` and `Version` newtypes
//! - [`meta`] - pagination metadata
//! - [`page`] - one fetched batch of resources
//! - [`resource`] - the `Resource` trait implemented by collection items

pub mod meta;
pub mod page;
pub mod primitives;
pub mod resource;

pub use meta::{Meta, FIRST_PAGE};
pub use page::Page;
pub use primitives::{Reference, Version};
pub use resource::Resource;
