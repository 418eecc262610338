//! Page-number pagination primitives shared by StackIt list views.
//!
//! The crate is independent of the client domain so that both the data
//! adapters (which translate a [`PageRequest`] into offsets) and the list
//! controller (which tracks navigation) agree on the same arithmetic.
//!
//! # Overview
//!
//! - [`PageNumber`] and [`PageSize`] are validated, one-based and non-zero.
//! - [`PageRequest`] pairs both and exposes the offset/limit a store needs.
//! - [`Page`] is the envelope a store returns: one slice plus the total count.
//! - [`visible_pages`] computes the page buttons a view exposes.
//! - [`PaginationState`] tracks the current page against a known total.
//!
//! # Example
//!
//! ```
//! use pagination::{PageSize, PaginationState};
//!
//! let size = PageSize::new(5).expect("non-zero size");
//! let mut state = PaginationState::new(size);
//! state.record_total(12);
//!
//! assert_eq!(state.page_count(), 3);
//! assert_eq!(state.visible_pages(), vec![1, 2, 3]);
//! assert!(state.next());
//! assert_eq!(state.current_page().get(), 2);
//! ```

mod envelope;
mod error;
mod navigation;
mod request;
mod window;

pub use envelope::Page;
pub use error::PaginationError;
pub use navigation::PaginationState;
pub use request::{PageNumber, PageRequest, PageSize};
pub use window::{PREDEFINED_WINDOW, effective_page_count, total_pages, visible_pages};
