//! Port for reading and creating questions in the data store.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{NewQuestion, Question, QuestionId, QuestionListQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by question store adapters.
    pub enum QuestionRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "question store connection failed: {message}",
        /// The store rejected or failed the request.
        Query { message: String } => "question store query failed: {message}",
        /// A response could not be decoded.
        Decode { message: String } => "question store returned malformed data: {message}",
    }
}

/// Port for question persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch one page of questions with the collection total after
    /// filtering.
    async fn list(&self, query: &QuestionListQuery)
    -> Result<Page<Question>, QuestionRepositoryError>;

    /// Fetch a question by id.
    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, QuestionRepositoryError>;

    /// Insert a question and return the stored row.
    async fn insert(&self, question: &NewQuestion) -> Result<Question, QuestionRepositoryError>;
}
