//! Port for reading and creating answers.

use async_trait::async_trait;

use crate::domain::{Answer, NewAnswer, QuestionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by answer store adapters.
    pub enum AnswerRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "answer store connection failed: {message}",
        /// The store rejected or failed the request.
        Query { message: String } => "answer store query failed: {message}",
        /// A response could not be decoded.
        Decode { message: String } => "answer store returned malformed data: {message}",
    }
}

/// Port for answer persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// Answers to `question_id`, accepted first and then by votes
    /// descending.
    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Answer>, AnswerRepositoryError>;

    /// Insert an answer and return the stored row.
    async fn insert(&self, answer: &NewAnswer) -> Result<Answer, AnswerRepositoryError>;
}
