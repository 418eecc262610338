//! Page envelope returned by paged stores.

use serde::{Deserialize, Serialize};

/// One page of items plus the total size of the filtered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total_items: u64,
}

impl<T> Page<T> {
    /// Wrap a slice of items and the collection total.
    #[must_use]
    pub const fn new(items: Vec<T>, total_items: u64) -> Self {
        Self { items, total_items }
    }

    /// An empty page of an empty collection.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Split the envelope into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total_items)
    }

    /// Transform each item, keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
