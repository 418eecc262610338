//! Same-session vote bookkeeping.
//!
//! The ledger remembers which targets the user already voted on in this
//! session and the local delta each vote contributed, so the displayed
//! count can move before the store confirms. The store still enforces one
//! vote per user and target; the ledger only stops repeat clicks.

use std::collections::HashMap;

use super::vote::{VoteDirection, VoteTarget};

/// Raised when a target already has a vote this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("already voted on {0}")]
pub struct AlreadyVoted(pub VoteTarget);

/// Votes cast in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    deltas: HashMap<VoteTarget, i64>,
}

impl VoteLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `target` already has a vote this session.
    pub fn has_voted(&self, target: VoteTarget) -> bool {
        self.deltas.contains_key(&target)
    }

    /// Record a first vote on `target` and return its local delta.
    ///
    /// # Examples
    /// ```
    /// use stackit_client::domain::{QuestionId, VoteDirection, VoteLedger, VoteTarget};
    ///
    /// let mut ledger = VoteLedger::new();
    /// let target = VoteTarget::Question(QuestionId::new(1));
    /// assert_eq!(ledger.record(target, VoteDirection::Up), Ok(1));
    /// assert!(ledger.record(target, VoteDirection::Up).is_err());
    /// assert_eq!(ledger.displayed_votes(target, 10), 11);
    /// ```
    pub fn record(
        &mut self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<i64, AlreadyVoted> {
        if self.has_voted(target) {
            return Err(AlreadyVoted(target));
        }
        let delta = direction.delta();
        self.deltas.insert(target, delta);
        Ok(delta)
    }

    /// Forget the vote on `target` so it can be cast again.
    ///
    /// Returns the delta that was removed, if any.
    pub fn rollback(&mut self, target: VoteTarget) -> Option<i64> {
        self.deltas.remove(&target)
    }

    /// Local delta for `target`; zero when no vote was cast.
    pub fn delta(&self, target: VoteTarget) -> i64 {
        self.deltas.get(&target).copied().unwrap_or_default()
    }

    /// Count to show: the stored total plus the local delta.
    pub fn displayed_votes(&self, target: VoteTarget, stored: i64) -> i64 {
        stored.saturating_add(self.delta(target))
    }
}
