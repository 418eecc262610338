//! Page-count arithmetic and the page-button window.

use crate::PageSize;

const WINDOW_LEN: u32 = 7;

/// Page buttons always offered once a collection spans more than seven pages.
pub const PREDEFINED_WINDOW: [u32; WINDOW_LEN as usize] = [1, 2, 3, 4, 5, 6, 7];

/// Number of pages needed for `total_items`, rounding up.
///
/// An empty collection has zero pages; see [`effective_page_count`] for the
/// value navigation and windowing use. Saturates at `u32::MAX`.
#[must_use]
pub fn total_pages(total_items: u64, size: PageSize) -> u32 {
    let pages = total_items.div_ceil(u64::from(size.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page count with an empty collection treated as one empty page.
#[must_use]
pub fn effective_page_count(total_items: u64, size: PageSize) -> u32 {
    total_pages(total_items, size).max(1)
}

/// Page numbers exposed as clickable controls.
///
/// Up to seven pages, every page is listed. Past seven, the predefined
/// window `1..=7` is followed by every remaining page, so the result is again
/// every page. This mirrors the shipped behaviour rather than a sliding
/// window around the current page and is pending product review.
///
/// A `total_pages` of zero yields the single page `[1]`.
///
/// # Examples
/// ```
/// use pagination::visible_pages;
///
/// assert_eq!(visible_pages(3), vec![1, 2, 3]);
/// assert_eq!(visible_pages(10), (1..=10).collect::<Vec<_>>());
/// ```
#[must_use]
pub fn visible_pages(total_pages: u32) -> Vec<u32> {
    let total = total_pages.max(1);
    if total <= WINDOW_LEN {
        return (1..=total).collect();
    }

    let mut pages = PREDEFINED_WINDOW.to_vec();
    pages.extend(WINDOW_LEN + 1..=total);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn size(value: u32) -> PageSize {
        PageSize::new(value).expect("non-zero size")
    }

    #[rstest]
    #[case(0, 5, 0)]
    #[case(1, 5, 1)]
    #[case(5, 5, 1)]
    #[case(6, 5, 2)]
    #[case(15, 5, 3)]
    #[case(16, 5, 4)]
    fn total_pages_rounds_up(#[case] items: u64, #[case] page_size: u32, #[case] pages: u32) {
        assert_eq!(total_pages(items, size(page_size)), pages);
    }

    #[rstest]
    fn empty_collection_counts_as_one_page() {
        assert_eq!(effective_page_count(0, size(5)), 1);
    }

    #[rstest]
    fn seven_pages_are_listed_in_full() {
        assert_eq!(visible_pages(7), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    fn more_than_seven_pages_degenerates_to_all_pages() {
        assert_eq!(visible_pages(10), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[rstest]
    fn zero_pages_still_shows_page_one() {
        assert_eq!(visible_pages(0), vec![1]);
    }
}
