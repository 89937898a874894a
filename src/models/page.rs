//! One fetched batch of resources together with its metadata.

use super::Meta;
use crate::{Error, Result};

/// A page of resources.
///
/// Pages are built once from a response and never change afterwards. A page
/// may legitimately hold fewer items than its declared `per_page`; all index
/// checks use the items actually held.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    meta: Meta,
    items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a page from its metadata and items.
    pub fn new(meta: Meta, items: Vec<T>) -> Self {
        if items.len() > meta.per_page as usize {
            tracing::warn!(
                "Page {} holds {} items but declares {} per page",
                meta.page,
                items.len(),
                meta.per_page
            );
        }
        Self { meta, items }
    }

    /// The page metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The page number reported by the server.
    pub fn number(&self) -> u32 {
        self.meta.page
    }

    /// Number of items actually held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items held by this page, in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Global index of the first item on this page.
    pub fn first_index(&self) -> usize {
        self.meta.first_index()
    }

    /// Returns `true` if the global `index` falls within this page's items.
    pub fn contains_index(&self, index: usize) -> bool {
        index
            .checked_sub(self.first_index())
            .is_some_and(|offset| self.contains_offset(offset))
    }

    /// Returns `true` if the page-relative `offset` addresses an item.
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset < self.items.len()
    }

    /// Returns `true` if the page is full, which suggests more may follow.
    pub fn is_not_last(&self) -> bool {
        self.items.len() == self.meta.per_page as usize
    }

    /// Get the item at a global index.
    pub fn at(&self, index: usize) -> Result<&T> {
        if !self.contains_index(index) {
            return Err(self.missing(index));
        }
        Ok(&self.items[index - self.first_index()])
    }

    /// Get the item at a page-relative offset.
    pub fn get(&self, offset: usize) -> Result<&T> {
        self.items.get(offset).ok_or_else(|| self.missing(offset))
    }

    fn missing(&self, index: usize) -> Error {
        Error::PageResourceDoesNotExist {
            index,
            page: self.meta.page,
            len: self.items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, per_page: u32) -> Meta {
        Meta {
            page,
            per_page,
            total_count: None,
            next: None,
        }
    }

    #[test]
    fn test_short_page() {
        let page = Page::new(meta(2, 3), vec!["d", "e"]);
        assert_eq!(page.len(), 2);
        assert_eq!(page.first_index(), 3);
        assert!(!page.is_not_last());

        assert!(page.contains_index(3));
        assert!(page.contains_index(4));
        // within the declared size but beyond the items held
        assert!(!page.contains_index(5));
        assert!(!page.contains_index(2));

        assert_eq!(*page.at(4).unwrap(), "e");
        assert!(page.at(5).unwrap_err().is_malformed_page());
    }

    #[test]
    fn test_full_page_is_not_last() {
        let page = Page::new(meta(1, 2), vec![1, 2]);
        assert!(page.is_not_last());
        assert_eq!(*page.get(1).unwrap(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let page = Page::new(meta(1, 2), vec![1]);
        match page.get(1) {
            Err(Error::PageResourceDoesNotExist { index, page, len }) => {
                assert_eq!(index, 1);
                assert_eq!(page, 1);
                assert_eq!(len, 1);
            }
            other => panic!("Expected PageResourceDoesNotExist, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u8> = Page::new(meta(3, 10), vec![]);
        assert!(page.is_empty());
        assert!(!page.contains_offset(0));
        assert!(!page.is_not_last());
    }

    #[test]
    fn test_oversize_page_keeps_items() {
        let page = Page::new(meta(1, 2), vec!["a", "b", "c"]);
        assert_eq!(page.len(), 3);
        assert!(!page.is_not_last());
        assert_eq!(*page.get(2).unwrap(), "c");
    }
}
