//! Splitting collection payloads into metadata and typed items.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Meta, Page};
use crate::Result;

/// Reads pages out of collection payloads of the form
/// `{ "meta": { .. }, "<resourceKey>": [ .. ] }`.
pub struct ResourceDeserializer<T> {
    resource_key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ResourceDeserializer<T> {
    /// Create a deserializer for items stored under `resource_key`.
    pub fn new(resource_key: impl Into<String>) -> Self {
        Self {
            resource_key: resource_key.into(),
            _marker: PhantomData,
        }
    }

    /// The key the items are stored under.
    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }
}

impl<T: DeserializeOwned> ResourceDeserializer<T> {
    /// The `meta` block, if the payload has one.
    pub fn meta_from(&self, payload: &Value) -> Result<Option<Meta>> {
        match payload.get("meta") {
            None | Some(Value::Null) => Ok(None),
            Some(meta) => Ok(Some(Meta::deserialize(meta)?)),
        }
    }

    /// Metadata for a payload without a `meta` block.
    pub fn empty_meta(&self, item_count: usize) -> Meta {
        Meta::empty(item_count)
    }

    /// The items, in payload order. A missing key means no items.
    pub fn contents_from(&self, payload: &Value) -> Result<Vec<T>> {
        match payload.get(&self.resource_key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(items) => Ok(Vec::<T>::deserialize(items)?),
        }
    }

    /// The declared total count, if any.
    pub fn total_count(&self, payload: &Value) -> Result<Option<u64>> {
        Ok(self.meta_from(payload)?.and_then(|meta| meta.total_count))
    }

    /// Build a page from a payload, substituting empty metadata when the
    /// payload has none.
    pub fn page_from(&self, payload: &Value) -> Result<Page<T>> {
        let items = self.contents_from(payload)?;
        let meta = match self.meta_from(payload)? {
            Some(meta) => meta,
            None => self.empty_meta(items.len()),
        };
        Ok(Page::new(meta, items))
    }
}

impl<T> Clone for ResourceDeserializer<T> {
    fn clone(&self) -> Self {
        Self {
            resource_key: self.resource_key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ResourceDeserializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDeserializer")
            .field("resource_key", &self.resource_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Item {
        my_field: String,
    }

    fn deserializer() -> ResourceDeserializer<Item> {
        ResourceDeserializer::new("someResources")
    }

    #[test]
    fn test_page_with_meta() {
        let payload = json!({
            "meta": { "page": 2, "perPage": 1, "totalCount": 2 },
            "someResources": [{ "myField": "theOtherValue" }]
        });

        let page = deserializer().page_from(&payload).unwrap();
        assert_eq!(page.number(), 2);
        assert_eq!(page.meta().total_count, Some(2));
        assert_eq!(page.items()[0].my_field, "theOtherValue");
    }

    #[test]
    fn test_page_without_meta() {
        let payload = json!({ "someResources": [{ "myField": "a" }, { "myField": "b" }] });

        let deserializer = deserializer();
        assert_eq!(deserializer.meta_from(&payload).unwrap(), None);

        let page = deserializer.page_from(&payload).unwrap();
        assert_eq!(page.meta(), &Meta::empty(2));
        assert!(page.is_not_last());
    }

    #[test]
    fn test_missing_resource_key() {
        let payload = json!({ "meta": { "page": 1, "perPage": 10, "totalCount": 0 } });
        let page = deserializer().page_from(&payload).unwrap();
        assert!(page.is_empty());
        assert_eq!(deserializer().total_count(&payload).unwrap(), Some(0));
    }

    #[test]
    fn test_malformed_items() {
        let payload = json!({ "someResources": { "myField": "not a list" } });
        assert!(matches!(
            deserializer().page_from(&payload),
            Err(crate::Error::Json(_))
        ));
    }
}
