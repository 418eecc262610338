//! Validated page numbers, page sizes, and the request that pairs them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// One-based page index.
///
/// ## Invariants
/// - The wrapped value is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(1);

    /// Validate and construct a page number.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageNumber`] when `value` is zero.
    pub const fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageNumber);
        }
        Ok(Self(value))
    }

    /// Raw one-based value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following page, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding page, or `None` on the first page.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        if self.0 > 1 {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }

    /// Whether this is page 1.
    #[must_use]
    pub const fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.0
    }
}

/// Number of items shown per page.
///
/// ## Invariants
/// - The wrapped value is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Page size used when none is configured.
    pub const DEFAULT: Self = Self(5);

    /// Validate and construct a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `value` is zero.
    pub const fn new(value: u32) -> Result<Self, PaginationError> {
        if value == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self(value))
    }

    /// Raw item count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// A request for one page of a collection.
///
/// # Examples
/// ```
/// use pagination::{PageNumber, PageRequest, PageSize};
///
/// let request = PageRequest::new(
///     PageNumber::new(3).expect("page"),
///     PageSize::new(5).expect("size"),
/// );
/// assert_eq!(request.offset(), 10);
/// assert_eq!(request.last_index(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: PageNumber,
    size: PageSize,
}

impl PageRequest {
    /// Pair a page number with a page size.
    #[must_use]
    pub const fn new(page: PageNumber, size: PageSize) -> Self {
        Self { page, size }
    }

    /// Requested page.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Zero-based index of the first item on the page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.size.get())
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.size.get()
    }

    /// Zero-based inclusive index of the last item on the page.
    ///
    /// Stores addressed with inclusive ranges (`Range: 0-4`) take
    /// `offset()..=last_index()`.
    #[must_use]
    pub fn last_index(&self) -> u64 {
        self.offset() + u64::from(self.size.get()) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zero_page_number_is_rejected() {
        assert_eq!(PageNumber::new(0), Err(PaginationError::ZeroPageNumber));
    }

    #[rstest]
    fn zero_page_size_is_rejected() {
        assert_eq!(PageSize::new(0), Err(PaginationError::ZeroPageSize));
    }

    #[rstest]
    fn previous_stops_at_first_page() {
        assert_eq!(PageNumber::FIRST.previous(), None);
        let second = PageNumber::new(2).expect("page");
        assert_eq!(second.previous(), Some(PageNumber::FIRST));
    }

    #[rstest]
    #[case(1, 5, 0, 4)]
    #[case(2, 5, 5, 9)]
    #[case(4, 10, 30, 39)]
    fn request_offsets_match_store_ranges(
        #[case] page: u32,
        #[case] size: u32,
        #[case] offset: u64,
        #[case] last: u64,
    ) {
        let request = PageRequest::new(
            PageNumber::new(page).expect("page"),
            PageSize::new(size).expect("size"),
        );
        assert_eq!(request.offset(), offset);
        assert_eq!(request.last_index(), last);
        assert_eq!(request.limit(), size);
    }

    #[rstest]
    fn page_number_deserialisation_rejects_zero() {
        let result: Result<PageNumber, _> = serde_json::from_str("0");
        assert!(result.is_err());
        let page: PageNumber = serde_json::from_str("7").expect("valid page");
        assert_eq!(page.get(), 7);
    }
}
