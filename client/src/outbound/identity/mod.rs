//! Identity Toolkit outbound adapter.
//!
//! Signs users in and up with email and password, sets display names, and
//! surfaces the provider's error messages (`EMAIL_EXISTS`,
//! `INVALID_LOGIN_CREDENTIALS`, …) verbatim.

mod dto;
mod toolkit;

pub use toolkit::IdentityToolkitProvider;
