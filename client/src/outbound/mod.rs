//! Outbound adapters implementing the domain ports.
//!
//! - [`memory`]: process-local store and identity provider, used by tests
//!   and by the binary when no data URL is configured.
//! - [`postgrest`]: questions, answers, and votes over PostgREST.
//! - [`identity`]: authentication over the Identity Toolkit REST API.

pub mod identity;
pub mod memory;
pub mod postgrest;
