//! Answers and answer drafts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{DraftValidationError, QuestionId};

/// Store-assigned answer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(i64);

impl AnswerId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An answer as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    /// Body in the markdown subset.
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order answers for display: accepted first, then by votes descending.
///
/// The sort is stable, so ties keep the order the store returned.
pub fn sort_for_display(answers: &mut [Answer]) {
    answers.sort_by(|a, b| {
        b.is_accepted
            .cmp(&a.is_accepted)
            .then_with(|| b.votes.cmp(&a.votes))
    });
}

/// Raw answer editor input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerDraft {
    pub content: String,
}

impl AnswerDraft {
    /// Wrap editor text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Validate the draft for `question_id`, attributed to `author`.
    pub fn validate(
        &self,
        question_id: QuestionId,
        author: impl Into<String>,
    ) -> Result<NewAnswer, DraftValidationError> {
        if self.content.trim().is_empty() {
            return Err(DraftValidationError::EmptyContent);
        }
        Ok(NewAnswer {
            question_id,
            content: self.content.clone(),
            author: author.into(),
            votes: 0,
            is_accepted: false,
        })
    }
}

/// Validated answer ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub content: String,
    pub author: String,
    pub votes: i64,
    pub is_accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn answer(id: i64, votes: i64, is_accepted: bool) -> Answer {
        let now = Utc::now();
        Answer {
            id: AnswerId::new(id),
            question_id: QuestionId::new(1),
            content: format!("answer {id}"),
            author: "ada".into(),
            votes,
            is_accepted,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn accepted_answers_lead_then_votes_descend() {
        let mut answers = vec![
            answer(1, 10, false),
            answer(2, 1, true),
            answer(3, 12, false),
            answer(4, 3, true),
        ];
        sort_for_display(&mut answers);
        let order: Vec<i64> = answers.iter().map(|a| a.id.get()).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[rstest]
    fn ties_keep_store_order() {
        let mut answers = vec![answer(7, 2, false), answer(5, 2, false), answer(6, 2, false)];
        sort_for_display(&mut answers);
        let order: Vec<i64> = answers.iter().map(|a| a.id.get()).collect();
        assert_eq!(order, vec![7, 5, 6]);
    }

    #[rstest]
    #[case("")]
    #[case(" \n\t")]
    fn blank_answers_are_rejected(#[case] content: &str) {
        let result = AnswerDraft::new(content).validate(QuestionId::new(1), "ada");
        assert_eq!(result, Err(DraftValidationError::EmptyContent));
    }

    #[rstest]
    fn new_answers_start_unvoted_and_unaccepted() {
        let answer = AnswerDraft::new("Use `Arc`.")
            .validate(QuestionId::new(9), "ada")
            .expect("valid");
        assert_eq!(answer.votes, 0);
        assert!(!answer.is_accepted);
        assert_eq!(answer.question_id, QuestionId::new(9));
    }
}
