//! Vote directions and targets.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::answer::AnswerId;
use super::question::QuestionId;
use super::user::UserId;

/// Up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Signed magnitude recorded by the store.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// What a vote is cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoteTarget {
    Question(QuestionId),
    Answer(AnswerId),
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question:{id}"),
            Self::Answer(id) => write!(f, "answer:{id}"),
        }
    }
}

/// One user's vote on one target, as upserted into the store.
///
/// The store keeps at most one record per `(user, target)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub user_id: UserId,
    pub target: VoteTarget,
    pub direction: VoteDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(VoteDirection::Up, 1)]
    #[case(VoteDirection::Down, -1)]
    fn directions_carry_unit_deltas(#[case] direction: VoteDirection, #[case] delta: i64) {
        assert_eq!(direction.delta(), delta);
    }

    #[rstest]
    fn targets_render_kind_and_id() {
        assert_eq!(VoteTarget::Question(QuestionId::new(3)).to_string(), "question:3");
        assert_eq!(VoteTarget::Answer(AnswerId::new(8)).to_string(), "answer:8");
    }
}
