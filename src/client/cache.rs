//! Per-iterator page storage.

use std::collections::HashMap;

use crate::models::Page;

/// Pages fetched by one iterator, keyed by the page number the server
/// reported. Append-only: a page number is stored once and never evicted.
pub(crate) struct PageCache<T> {
    pages: HashMap<u32, Page<T>>,
}

impl<T> PageCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, number: u32) -> Option<&Page<T>> {
        self.pages.get(&number)
    }

    pub(crate) fn contains(&self, number: u32) -> bool {
        self.pages.contains_key(&number)
    }

    /// Store `page` under its own number. Returns `false`, leaving the cache
    /// unchanged, if that number is already taken.
    pub(crate) fn insert(&mut self, page: Page<T>) -> bool {
        match self.pages.entry(page.number()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(page);
                true
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meta;

    fn page(number: u32, items: Vec<&'static str>) -> Page<&'static str> {
        Page::new(
            Meta {
                page: number,
                per_page: 2,
                total_count: None,
                next: None,
            },
            items,
        )
    }

    #[test]
    fn test_insert_is_append_only() {
        let mut cache = PageCache::new();
        assert!(cache.insert(page(1, vec!["a", "b"])));
        assert!(!cache.insert(page(1, vec!["x"])));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().items(), &["a", "b"]);
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }
}
