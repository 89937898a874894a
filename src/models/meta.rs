//! Pagination metadata carried in the `meta` block of a collection response.

use serde::{Deserialize, Serialize};

/// Number of the first page of every collection.
pub const FIRST_PAGE: u32 = 1;

/// Pagination metadata for one fetched page.
///
/// ```json
/// { "page": 2, "perPage": 100, "totalCount": 250, "next": "/contents?page=3" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Page number, starting at [`FIRST_PAGE`].
    pub page: u32,
    /// Declared page size. A page may hold fewer items than this.
    pub per_page: u32,
    /// Total number of resources across all pages, when the server knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    /// Reference to the next page, absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl Meta {
    /// Metadata standing in for a response that carried no `meta` block.
    ///
    /// The response is treated as the first and only page, sized to exactly
    /// the items it holds.
    pub fn empty(item_count: usize) -> Self {
        Self {
            page: FIRST_PAGE,
            per_page: u32::try_from(item_count).unwrap_or(u32::MAX),
            total_count: None,
            next: None,
        }
    }

    /// Returns `true` if the server declared a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Global index of the first item on this page.
    pub fn first_index(&self) -> usize {
        self.page.saturating_sub(FIRST_PAGE) as usize * self.per_page as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_deserialize() {
        let meta: Meta = serde_json::from_value(serde_json::json!({
            "page": 2,
            "perPage": 10,
            "totalCount": 15,
            "next": null
        }))
        .unwrap();

        assert_eq!(meta.page, 2);
        assert_eq!(meta.per_page, 10);
        assert_eq!(meta.total_count, Some(15));
        assert!(!meta.has_next());
        assert_eq!(meta.first_index(), 10);
    }

    #[test]
    fn test_meta_optional_fields() {
        let meta: Meta =
            serde_json::from_str(r#"{"page":1,"perPage":5,"next":"/items?page=2"}"#).unwrap();
        assert_eq!(meta.total_count, None);
        assert!(meta.has_next());
    }

    #[test]
    fn test_empty_meta() {
        let meta = Meta::empty(3);
        assert_eq!(meta.page, FIRST_PAGE);
        assert_eq!(meta.per_page, 3);
        assert_eq!(meta.total_count, None);
        assert!(!meta.has_next());
        assert_eq!(meta.first_index(), 0);
    }
}
