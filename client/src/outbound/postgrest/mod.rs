//! PostgREST outbound adapter.
//!
//! Implements the question, answer, and vote ports against a hosted
//! Postgres REST API: `offset`/`limit` paging with `Prefer: count=exact`,
//! `or=(…)` search filters, representation-returning inserts, and
//! merge-duplicates upserts keyed on the vote's conflict columns.

mod dto;
mod query;
mod store;

pub use store::PostgrestStore;
