//! Current-page tracking against a known collection total.

use crate::window::{effective_page_count, total_pages, visible_pages};
use crate::{PageNumber, PageRequest, PageSize};

/// Navigation state for one paged list.
///
/// The page size is fixed for the lifetime of the state. The total is
/// replaced whenever a store response arrives; the current page is only
/// moved by explicit navigation and is not re-validated against the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current: PageNumber,
    size: PageSize,
    total_items: u64,
}

impl PaginationState {
    /// Start on page 1 of an empty collection.
    #[must_use]
    pub const fn new(size: PageSize) -> Self {
        Self {
            current: PageNumber::FIRST,
            size,
            total_items: 0,
        }
    }

    /// Page currently shown.
    #[must_use]
    pub const fn current_page(&self) -> PageNumber {
        self.current
    }

    /// Fixed page size.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.size
    }

    /// Last recorded collection total.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Pages needed for the recorded total (zero for an empty collection).
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.size)
    }

    /// Pages used for navigation, counting an empty collection as one page.
    #[must_use]
    pub fn page_count(&self) -> u32 {
        effective_page_count(self.total_items, self.size)
    }

    /// Page buttons to expose.
    #[must_use]
    pub fn visible_pages(&self) -> Vec<u32> {
        visible_pages(self.total_pages())
    }

    /// Request for the current page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        PageRequest::new(self.current, self.size)
    }

    /// Whether the "Previous" control is enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        !self.current.is_first()
    }

    /// Whether the "Next" control is enabled.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current.get() < self.page_count()
    }

    /// Record the collection total from a store response.
    pub const fn record_total(&mut self, total_items: u64) {
        self.total_items = total_items;
    }

    /// Jump to `page`. Returns whether the current page changed.
    pub fn select(&mut self, page: PageNumber) -> bool {
        let changed = self.current != page;
        self.current = page;
        changed
    }

    /// Advance one page when "Next" is enabled. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.select(self.current.next())
    }

    /// Go back one page when "Previous" is enabled. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        match self.current.previous() {
            Some(page) => self.select(page),
            None => false,
        }
    }

    /// Return to page 1. Returns whether the current page changed.
    pub fn reset(&mut self) -> bool {
        self.select(PageNumber::FIRST)
    }

    /// Items of the current page from a fully loaded collection.
    ///
    /// Pages past the end yield an empty slice.
    #[must_use]
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let request = self.request();
        let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let begin = start.min(items.len());
        let end = start.saturating_add(len).min(items.len());
        items.get(begin..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> PaginationState {
        PaginationState::new(PageSize::new(5).expect("size"))
    }

    fn page(value: u32) -> PageNumber {
        PageNumber::new(value).expect("page")
    }

    #[rstest]
    fn empty_collection_disables_both_controls(state: PaginationState) {
        assert!(!state.has_previous());
        assert!(!state.has_next());
        assert_eq!(state.visible_pages(), vec![1]);
    }

    #[rstest]
    fn next_and_previous_respect_bounds(mut state: PaginationState) {
        state.record_total(11);
        assert!(state.next());
        assert!(state.next());
        assert_eq!(state.current_page(), page(3));
        assert!(!state.has_next());
        assert!(!state.next());
        assert!(state.previous());
        assert_eq!(state.current_page(), page(2));
    }

    #[rstest]
    fn select_reports_change(mut state: PaginationState) {
        state.record_total(40);
        assert!(state.select(page(4)));
        assert!(!state.select(page(4)));
        assert!(state.reset());
        assert!(!state.reset());
    }

    #[rstest]
    #[case(1, &[1, 2, 3, 4, 5])]
    #[case(3, &[11, 12])]
    #[case(4, &[])]
    fn page_slice_cuts_local_collections(
        mut state: PaginationState,
        #[case] current: u32,
        #[case] expected: &[u32],
    ) {
        let items: Vec<u32> = (1..=12).collect();
        state.record_total(12);
        state.select(page(current));
        assert_eq!(state.page_slice(&items), expected);
    }
}
