//! Question detail page: the question, its answers, and answer submission.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ports::{AnswerRepository, IdentityProvider, QuestionRepository};
use super::store_errors::{from_answer_store, from_question_store};
use super::{Answer, AnswerDraft, Error, Question, QuestionId, sort_for_display, time_ago};

/// An answer with its rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerView {
    pub answer: Answer,
    pub content_html: String,
    /// Relative creation time, e.g. "3 days ago".
    pub answered: String,
}

/// A question with rendered body and display-ordered answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub description_html: String,
    /// Relative creation time, e.g. "2 hours ago".
    pub asked: String,
    pub answers: Vec<AnswerView>,
}

/// Loads question details and accepts new answers.
pub struct QuestionDetailService<Q: ?Sized, A: ?Sized, I: ?Sized> {
    questions: Arc<Q>,
    answers: Arc<A>,
    identity: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<Q: ?Sized, A: ?Sized, I: ?Sized> QuestionDetailService<Q, A, I> {
    /// Create the service.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use stackit_client::domain::QuestionDetailService;
    /// # use stackit_client::outbound::memory::{InMemoryIdentityProvider, InMemoryStore};
    /// let store = Arc::new(InMemoryStore::default());
    /// let service = QuestionDetailService::new(
    ///     store.clone(),
    ///     store,
    ///     Arc::new(InMemoryIdentityProvider::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        questions: Arc<Q>,
        answers: Arc<A>,
        identity: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            questions,
            answers,
            identity,
            clock,
        }
    }
}

impl<Q, A, I> QuestionDetailService<Q, A, I>
where
    Q: QuestionRepository + ?Sized,
    A: AnswerRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    /// Load question `id` with its answers, accepted first and then by
    /// votes.
    pub async fn load(&self, id: QuestionId) -> Result<QuestionDetail, Error> {
        let question = self
            .questions
            .find_by_id(id)
            .await
            .map_err(from_question_store)?
            .ok_or_else(|| Error::not_found(format!("question {id} does not exist")))?;
        let mut answers = self
            .answers
            .list_for_question(id)
            .await
            .map_err(from_answer_store)?;
        sort_for_display(&mut answers);
        debug!(question_id = %id, answers = answers.len(), "question detail loaded");

        let now = self.clock.utc();
        Ok(QuestionDetail {
            description_html: markdown_subset::render(&question.description),
            asked: time_ago(question.created_at, now),
            answers: answers
                .into_iter()
                .map(|answer| AnswerView {
                    content_html: markdown_subset::render(&answer.content),
                    answered: time_ago(answer.created_at, now),
                    answer,
                })
                .collect(),
            question,
        })
    }

    /// Post an answer to `question_id` as the signed-in user.
    pub async fn submit_answer(
        &self,
        question_id: QuestionId,
        draft: &AnswerDraft,
    ) -> Result<Answer, Error> {
        let user = self
            .identity
            .current_user()
            .ok_or_else(|| Error::unauthorized("sign in to post an answer"))?;
        let new_answer = draft
            .validate(question_id, user.author_name())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.answers
            .insert(&new_answer)
            .await
            .inspect(|answer| {
                info!(question_id = %question_id, answer_id = %answer.id, "answer posted");
            })
            .map_err(|err| {
                warn!(question_id = %question_id, error = %err, "answer insert failed");
                from_answer_store(err)
            })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        AnswerRepositoryError, MockAnswerRepository, MockIdentityProvider, MockQuestionRepository,
    };
    use crate::domain::{AnswerId, ErrorCode, SessionUser, UserId};
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn question(now: DateTime<Utc>) -> Question {
        Question {
            id: QuestionId::new(1),
            title: "How do I share state?".into(),
            description: "Use **Arc**".into(),
            tags: vec!["rust".into()],
            votes: 3,
            views: 10,
            author: "ada".into(),
            created_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(2),
            answer_count: 3,
        }
    }

    fn answer(id: i64, votes: i64, is_accepted: bool, now: DateTime<Utc>) -> Answer {
        Answer {
            id: AnswerId::new(id),
            question_id: QuestionId::new(1),
            content: format!("*answer {id}*"),
            author: "grace".into(),
            votes,
            is_accepted,
            created_at: now - Duration::days(id),
            updated_at: now - Duration::days(id),
        }
    }

    fn service(
        questions: MockQuestionRepository,
        answers: MockAnswerRepository,
        identity: MockIdentityProvider,
        now: DateTime<Utc>,
    ) -> QuestionDetailService<MockQuestionRepository, MockAnswerRepository, MockIdentityProvider>
    {
        QuestionDetailService::new(
            Arc::new(questions),
            Arc::new(answers),
            Arc::new(identity),
            Arc::new(FixtureClock { utc_now: now }),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn load_renders_and_orders_answers(now: DateTime<Utc>) {
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(question(now))));
        let mut answers = MockAnswerRepository::new();
        answers.expect_list_for_question().returning(move |_| {
            Ok(vec![
                answer(1, 5, false, now),
                answer(2, 9, false, now),
                answer(3, 0, true, now),
            ])
        });

        let detail = service(questions, answers, MockIdentityProvider::new(), now)
            .load(QuestionId::new(1))
            .await
            .expect("detail");

        assert_eq!(detail.description_html, "Use <strong>Arc</strong>");
        assert_eq!(detail.asked, "2 hours ago");
        let order: Vec<i64> = detail.answers.iter().map(|a| a.answer.id.get()).collect();
        assert_eq!(order, vec![3, 2, 1]);
        let first = detail.answers.first().expect("answer");
        assert_eq!(first.content_html, "<em>answer 3</em>");
        assert_eq!(first.answered, "3 days ago");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_question_is_not_found(now: DateTime<Utc>) {
        let mut questions = MockQuestionRepository::new();
        questions.expect_find_by_id().returning(|_| Ok(None));
        let mut answers = MockAnswerRepository::new();
        answers.expect_list_for_question().never();

        let err = service(questions, answers, MockIdentityProvider::new(), now)
            .load(QuestionId::new(9))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn answers_are_attributed_to_the_signed_in_user(now: DateTime<Utc>) {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().return_const(Some(SessionUser::new(
            UserId::new("uid").expect("id"),
            Some("Grace".into()),
            None,
        )));
        let mut answers = MockAnswerRepository::new();
        answers
            .expect_insert()
            .withf(|a| a.author == "Grace" && a.votes == 0 && !a.is_accepted)
            .times(1)
            .returning(move |a| {
                Ok(Answer {
                    id: AnswerId::new(11),
                    question_id: a.question_id,
                    content: a.content.clone(),
                    author: a.author.clone(),
                    votes: 0,
                    is_accepted: false,
                    created_at: now,
                    updated_at: now,
                })
            });

        let posted = service(MockQuestionRepository::new(), answers, identity, now)
            .submit_answer(QuestionId::new(1), &AnswerDraft::new("Try `Rc`."))
            .await
            .expect("posted");
        assert_eq!(posted.id, AnswerId::new(11));
    }

    #[rstest]
    #[tokio::test]
    async fn blank_answers_and_store_failures_are_reported(now: DateTime<Utc>) {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().return_const(Some(SessionUser::new(
            UserId::new("uid").expect("id"),
            None,
            None,
        )));
        let mut answers = MockAnswerRepository::new();
        answers
            .expect_insert()
            .times(1)
            .returning(|_| Err(AnswerRepositoryError::query("permission denied")));
        let service = service(MockQuestionRepository::new(), answers, identity, now);

        let blank = service
            .submit_answer(QuestionId::new(1), &AnswerDraft::new("  "))
            .await
            .expect_err("blank");
        assert_eq!(blank.code(), ErrorCode::InvalidRequest);

        let failed = service
            .submit_answer(QuestionId::new(1), &AnswerDraft::new("text"))
            .await
            .expect_err("store failure");
        assert_eq!(failed.code(), ErrorCode::InternalError);
        assert!(failed.message().contains("permission denied"));
    }
}
