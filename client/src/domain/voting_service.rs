//! Voting on questions and answers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;
use tracing::{info, warn};

use super::ports::{IdentityProvider, VoteRepository};
use super::store_errors::from_vote_store;
use super::{Error, VoteDirection, VoteLedger, VoteRecord, VoteTarget};

/// Casts votes through the store, guarded by a session [`VoteLedger`].
pub struct VotingService<V: ?Sized, I: ?Sized> {
    votes: Arc<V>,
    identity: Arc<I>,
    ledger: Mutex<VoteLedger>,
}

impl<V: ?Sized, I: ?Sized> VotingService<V, I> {
    /// Create a service with an empty ledger.
    pub fn new(votes: Arc<V>, identity: Arc<I>) -> Self {
        Self {
            votes,
            identity,
            ledger: Mutex::new(VoteLedger::new()),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, VoteLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `target` already has a vote this session.
    pub fn has_voted(&self, target: VoteTarget) -> bool {
        self.ledger().has_voted(target)
    }

    /// Count to display for `target` given its stored total.
    pub fn displayed_votes(&self, target: VoteTarget, stored: i64) -> i64 {
        self.ledger().displayed_votes(target, stored)
    }
}

impl<V, I> VotingService<V, I>
where
    V: VoteRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    /// Cast a vote and return the local delta it applied.
    ///
    /// A repeat vote on the same target is rejected as a conflict without
    /// touching the store. When the store refuses the upsert the ledger
    /// entry is rolled back so the user may try again.
    pub async fn vote(&self, target: VoteTarget, direction: VoteDirection) -> Result<i64, Error> {
        let user = self
            .identity
            .current_user()
            .ok_or_else(|| Error::unauthorized("sign in to vote"))?;
        let delta = self.ledger().record(target, direction).map_err(|err| {
            info!(%target, "repeat vote ignored");
            Error::conflict(err.to_string()).with_details(json!({ "target": target.to_string() }))
        })?;

        let record = VoteRecord {
            user_id: user.id,
            target,
            direction,
        };
        if let Err(err) = self.votes.upsert(&record).await {
            self.ledger().rollback(target);
            warn!(%target, error = %err, "vote rolled back");
            return Err(from_vote_store(err));
        }
        info!(%target, delta, "vote recorded");
        Ok(delta)
    }
}
