//! Process-local adapters for tests and offline use.

mod identity;
mod store;

pub use identity::InMemoryIdentityProvider;
pub use store::InMemoryStore;
