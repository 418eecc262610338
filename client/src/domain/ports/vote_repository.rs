//! Port for recording votes.

use async_trait::async_trait;

use crate::domain::VoteRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote store adapters.
    pub enum VoteRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "vote store connection failed: {message}",
        /// The store rejected the upsert.
        Query { message: String } => "vote store upsert failed: {message}",
    }
}

/// Port for vote persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert the vote, or replace the user's earlier vote on the same
    /// target. The store keeps parent vote totals in step.
    async fn upsert(&self, vote: &VoteRecord) -> Result<(), VoteRepositoryError>;
}
