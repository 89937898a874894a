//! Resource collection endpoints.
//!
//! A [`ResourceEndpoint`] is one collection URL. It pages through the
//! collection lazily, reads resources by reference, and stores, updates or
//! deletes them. Collections with a different URL layout can implement
//! [`PageableEndpoint`] and still be browsed by a
//! [`ResourceIterator`](crate::client::ResourceIterator).

mod endpoint;

pub use endpoint::{PageableEndpoint, ResourceEndpoint};
