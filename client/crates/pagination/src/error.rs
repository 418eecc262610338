//! Error types for the pagination crate.

use thiserror::Error;

/// Errors raised when constructing pagination primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers are one-based; zero is not a page.
    #[error("page number must be at least 1")]
    ZeroPageNumber,

    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}
