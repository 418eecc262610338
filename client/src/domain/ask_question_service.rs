//! Ask-question flow.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{IdentityProvider, QuestionRepository};
use super::store_errors::from_question_store;
use super::{Error, Question, QuestionDraft};

/// Validates drafts and inserts them as the signed-in user.
pub struct AskQuestionService<Q: ?Sized, I: ?Sized> {
    questions: Arc<Q>,
    identity: Arc<I>,
}

impl<Q: ?Sized, I: ?Sized> AskQuestionService<Q, I> {
    /// Create a service over the question store and identity provider.
    pub fn new(questions: Arc<Q>, identity: Arc<I>) -> Self {
        Self {
            questions,
            identity,
        }
    }
}

impl<Q, I> AskQuestionService<Q, I>
where
    Q: QuestionRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    /// Submit `draft`.
    ///
    /// Nothing reaches the store unless a user is signed in and the draft
    /// validates. The draft is borrowed, so the caller still holds it when
    /// the insert fails.
    pub async fn submit(&self, draft: &QuestionDraft) -> Result<Question, Error> {
        let user = self
            .identity
            .current_user()
            .ok_or_else(|| Error::unauthorized("sign in to ask a question"))?;
        let new_question = draft
            .validate(user.author_name())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        match self.questions.insert(&new_question).await {
            Ok(question) => {
                info!(question_id = %question.id, tags = question.tags.len(), "question posted");
                Ok(question)
            }
            Err(err) => {
                warn!(error = %err, "question insert failed");
                Err(from_question_store(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockIdentityProvider, MockQuestionRepository, QuestionRepositoryError,
    };
    use crate::domain::{ErrorCode, QuestionId, SessionUser, UserId};
    use chrono::Utc;
    use mockall::predicate::always;
    use rstest::rstest;

    fn signed_in(display_name: Option<&str>) -> MockIdentityProvider {
        let mut identity = MockIdentityProvider::new();
        let user = SessionUser::new(
            UserId::new("uid-1").expect("id"),
            display_name.map(Into::into),
            Some("ada@example.com".into()),
        );
        identity.expect_current_user().return_const(Some(user));
        identity
    }

    fn signed_out() -> MockIdentityProvider {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().return_const(None::<SessionUser>);
        identity
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_validated_question_as_signed_in_author() {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_insert()
            .withf(|q| {
                q.title == "Lifetimes?" && q.author == "ada@example.com" && q.tags == ["rust"]
            })
            .times(1)
            .returning(|q| {
                let now = Utc::now();
                Ok(Question {
                    id: QuestionId::new(42),
                    title: q.title.clone(),
                    description: q.description.clone(),
                    tags: q.tags.clone(),
                    votes: 0,
                    views: 0,
                    author: q.author.clone(),
                    created_at: now,
                    updated_at: now,
                    answer_count: 0,
                })
            });
        let service = AskQuestionService::new(Arc::new(questions), Arc::new(signed_in(None)));

        let draft = QuestionDraft::new(" Lifetimes? ", "Why?", "rust, rust");
        let question = service.submit(&draft).await.expect("posted");
        assert_eq!(question.id, QuestionId::new(42));
    }

    #[rstest]
    #[tokio::test]
    async fn signed_out_users_cannot_ask() {
        let mut questions = MockQuestionRepository::new();
        questions.expect_insert().never();
        let service = AskQuestionService::new(Arc::new(questions), Arc::new(signed_out()));

        let err = service
            .submit(&QuestionDraft::new("t", "d", ""))
            .await
            .expect_err("unauthorised");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_drafts_never_reach_the_store() {
        let mut questions = MockQuestionRepository::new();
        questions.expect_insert().never();
        let service =
            AskQuestionService::new(Arc::new(questions), Arc::new(signed_in(Some("Ada"))));

        let err = service
            .submit(&QuestionDraft::new("t", "  ", ""))
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "description must not be empty");
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_surface_and_leave_the_draft_intact() {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_insert()
            .with(always())
            .times(1)
            .returning(|_| Err(QuestionRepositoryError::connection("timeout")));
        let service =
            AskQuestionService::new(Arc::new(questions), Arc::new(signed_in(Some("Ada"))));

        let draft = QuestionDraft::new("t", "d", "x");
        let err = service.submit(&draft).await.expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(draft, QuestionDraft::new("t", "d", "x"));
    }
}
