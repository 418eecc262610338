//! StackIt question-and-answer client core.
//!
//! The [`domain`] module holds the list controller, vote bookkeeping, and
//! the services behind each screen. [`outbound`] adapts them to hosted
//! PostgREST and Identity Toolkit endpoints or to in-memory fakes, and
//! [`config`] reads connection settings from `STACKIT_*` variables.

pub mod config;
pub mod domain;
pub mod outbound;
