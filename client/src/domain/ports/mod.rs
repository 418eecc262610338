//! Driven ports for the data store and identity provider.

mod macros;
pub(crate) use macros::define_port_error;

mod answer_repository;
mod identity_provider;
mod question_repository;
mod vote_repository;

#[cfg(test)]
pub use answer_repository::MockAnswerRepository;
pub use answer_repository::{AnswerRepository, AnswerRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::{QuestionRepository, QuestionRepositoryError};
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{VoteRepository, VoteRepositoryError};
