//! In-memory data store.
//!
//! Implements the question, answer, and vote ports over process-local
//! collections. Used by tests and by the `stackit` binary when no data URL
//! is configured. It reproduces the hosted store's rules: filtered totals,
//! answer ordering, and one vote per user and target with parent totals
//! adjusted on every upsert.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use pagination::Page;

use crate::domain::ports::{
    AnswerRepository, AnswerRepositoryError, QuestionRepository, QuestionRepositoryError,
    VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    Answer, AnswerId, NewAnswer, NewQuestion, Question, QuestionId, QuestionListQuery,
    QuestionSort, UserId, VoteDirection, VoteRecord, VoteTarget,
};

#[derive(Debug, Default)]
struct Collections {
    questions: Vec<Question>,
    answers: Vec<Answer>,
    votes: HashMap<(UserId, VoteTarget), VoteDirection>,
    next_question_id: i64,
    next_answer_id: i64,
}

impl Collections {
    fn question_mut(&mut self, id: QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == id)
    }

    fn answer_mut(&mut self, id: AnswerId) -> Option<&mut Answer> {
        self.answers.iter_mut().find(|a| a.id == id)
    }
}

/// Process-local question, answer, and vote store.
pub struct InMemoryStore {
    collections: Mutex<Collections>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Empty store stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            collections: Mutex::new(Collections {
                next_question_id: 1,
                next_answer_id: 1,
                ..Collections::default()
            }),
            clock,
        }
    }

    /// Store pre-filled with a handful of sample questions and answers.
    pub fn with_sample_content(clock: Arc<dyn Clock>) -> Self {
        let store = Self::with_clock(clock);
        let now = store.clock.utc();
        let samples = [
            (
                "How do I share state between Tokio tasks?",
                "I have a counter that several tasks update.\n• `Mutex`?\n• channels?",
                &["rust", "tokio"][..],
                Duration::hours(3),
                4,
            ),
            (
                "Why does the borrow checker reject this loop?",
                "The loop pushes into a vector while **iterating** it.",
                &["rust", "borrow-checker"][..],
                Duration::days(1),
                9,
            ),
            (
                "Serialising enums with serde",
                "How do I get `snake_case` tags?\n1. derive\n2. attribute?",
                &["serde"][..],
                Duration::days(9),
                2,
            ),
        ];
        {
            let mut collections = store.collections();
            for (title, description, tags, age, votes) in samples {
                let id = QuestionId::new(collections.next_question_id);
                collections.next_question_id += 1;
                collections.questions.push(Question {
                    id,
                    title: title.to_owned(),
                    description: description.to_owned(),
                    tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
                    votes,
                    views: 0,
                    author: "sample".to_owned(),
                    created_at: now - age,
                    updated_at: now - age,
                    answer_count: 0,
                });
            }
            let answer_id = AnswerId::new(collections.next_answer_id);
            collections.next_answer_id += 1;
            collections.answers.push(Answer {
                id: answer_id,
                question_id: QuestionId::new(2),
                content: "Collect the new items first, then *extend* the vector.".to_owned(),
                author: "sample".to_owned(),
                votes: 3,
                is_accepted: true,
                created_at: now - Duration::hours(20),
                updated_at: now - Duration::hours(20),
            });
            if let Some(question) = collections.question_mut(QuestionId::new(2)) {
                question.answer_count = 1;
            }
        }
        store
    }

    fn collections(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a stored question as-is. Later inserts get ids above it.
    pub fn seed_question(&self, question: Question) {
        let mut collections = self.collections();
        collections.next_question_id = collections.next_question_id.max(question.id.get() + 1);
        collections.questions.push(question);
    }

    /// Add a stored answer as-is. Later inserts get ids above it.
    pub fn seed_answer(&self, answer: Answer) {
        let mut collections = self.collections();
        collections.next_answer_id = collections.next_answer_id.max(answer.id.get() + 1);
        collections.answers.push(answer);
    }

    /// Stored vote of `user` on `target`.
    pub fn vote_of(&self, user: &UserId, target: VoteTarget) -> Option<VoteDirection> {
        self.collections()
            .votes
            .get(&(user.clone(), target))
            .copied()
    }

    /// Stored total for `target`.
    pub fn votes_on(&self, target: VoteTarget) -> Option<i64> {
        let mut collections = self.collections();
        match target {
            VoteTarget::Question(id) => collections.question_mut(id).map(|q| q.votes),
            VoteTarget::Answer(id) => collections.answer_mut(id).map(|a| a.votes),
        }
    }
}

fn sort_questions(questions: &mut [Question], sort: QuestionSort) {
    match sort {
        QuestionSort::Newest | QuestionSort::Unanswered => {
            questions.sort_by_key(|q| (Reverse(q.created_at), Reverse(q.id)));
        }
        QuestionSort::MostVoted => {
            questions.sort_by_key(|q| (Reverse(q.votes), Reverse(q.created_at), Reverse(q.id)));
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn list(
        &self,
        query: &QuestionListQuery,
    ) -> Result<Page<Question>, QuestionRepositoryError> {
        let mut matching: Vec<Question> = self
            .collections()
            .questions
            .iter()
            .filter(|q| query.sort != QuestionSort::Unanswered || q.answer_count == 0)
            .filter(|q| query.search.as_ref().is_none_or(|search| search.matches(q)))
            .cloned()
            .collect();
        sort_questions(&mut matching, query.sort);

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total))
    }

    async fn find_by_id(
        &self,
        id: QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        Ok(self
            .collections()
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn insert(&self, question: &NewQuestion) -> Result<Question, QuestionRepositoryError> {
        let now = self.clock.utc();
        let mut collections = self.collections();
        let id = QuestionId::new(collections.next_question_id);
        collections.next_question_id += 1;
        let stored = Question {
            id,
            title: question.title.clone(),
            description: question.description.clone(),
            tags: question.tags.clone(),
            votes: 0,
            views: 0,
            author: question.author.clone(),
            created_at: now,
            updated_at: now,
            answer_count: 0,
        };
        collections.questions.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl AnswerRepository for InMemoryStore {
    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Answer>, AnswerRepositoryError> {
        let mut answers: Vec<Answer> = self
            .collections()
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| (Reverse(a.is_accepted), Reverse(a.votes)));
        Ok(answers)
    }

    async fn insert(&self, answer: &NewAnswer) -> Result<Answer, AnswerRepositoryError> {
        let now = self.clock.utc();
        let mut collections = self.collections();
        let question = collections.question_mut(answer.question_id).ok_or_else(|| {
            AnswerRepositoryError::query(format!("question {} does not exist", answer.question_id))
        })?;
        question.answer_count += 1;
        let id = AnswerId::new(collections.next_answer_id);
        collections.next_answer_id += 1;
        let stored = Answer {
            id,
            question_id: answer.question_id,
            content: answer.content.clone(),
            author: answer.author.clone(),
            votes: answer.votes,
            is_accepted: answer.is_accepted,
            created_at: now,
            updated_at: now,
        };
        collections.answers.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn upsert(&self, vote: &VoteRecord) -> Result<(), VoteRepositoryError> {
        let now = self.clock.utc();
        let mut collections = self.collections();
        let key = (vote.user_id.clone(), vote.target);
        let previous = collections.votes.get(&key).map_or(0, |d| d.delta());
        let change = vote.direction.delta() - previous;
        match vote.target {
            VoteTarget::Question(id) => {
                let question = collections
                    .question_mut(id)
                    .ok_or_else(|| {
                        VoteRepositoryError::query(format!("question {id} does not exist"))
                    })?;
                question.votes += change;
                question.updated_at = now;
            }
            VoteTarget::Answer(id) => {
                let answer = collections
                    .answer_mut(id)
                    .ok_or_else(|| {
                        VoteRepositoryError::query(format!("answer {id} does not exist"))
                    })?;
                answer.votes += change;
                answer.updated_at = now;
            }
        }
        collections.votes.insert(key, vote.direction);
        Ok(())
    }
}
