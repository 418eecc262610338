//! Reqwest-backed PostgREST store adapter.
//!
//! This adapter owns transport details only: query construction, headers,
//! status mapping, and JSON decoding into domain rows. Parent vote totals
//! are maintained by the hosted store itself.

use std::time::Duration;

use async_trait::async_trait;
use pagination::Page;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::PostgrestErrorDto;
use super::query::{
    ANSWERS, PREFER_COUNT, PREFER_MERGE, PREFER_REPRESENTATION, QUESTIONS, VOTES,
    answer_list_params, parse_content_range_total, question_list_params, vote_upsert,
};
use crate::domain::ports::{
    AnswerRepository, AnswerRepositoryError, QuestionRepository, QuestionRepositoryError,
    VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    Answer, NewAnswer, NewQuestion, Question, QuestionId, QuestionListQuery, VoteRecord,
};

const PREFER: &str = "Prefer";
const API_KEY: &str = "apikey";
const CONTENT_RANGE: &str = "content-range";

/// Transport outcome shared by the three ports before mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    Transport(String),
    Status(String),
    Decode(String),
}

impl From<Failure> for QuestionRepositoryError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Transport(message) => Self::connection(message),
            Failure::Status(message) => Self::query(message),
            Failure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<Failure> for AnswerRepositoryError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Transport(message) => Self::connection(message),
            Failure::Status(message) => Self::query(message),
            Failure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<Failure> for VoteRepositoryError {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Transport(message) => Self::connection(message),
            Failure::Status(message) | Failure::Decode(message) => Self::query(message),
        }
    }
}

/// Store adapter speaking PostgREST over HTTP.
pub struct PostgrestStore {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl PostgrestStore {
    /// Build an adapter rooted at `base` (the REST root, e.g.
    /// `https://project.example.co/rest/v1/`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            api_key,
        })
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, Failure> {
        let url = self
            .base
            .join(table)
            .map_err(|err| Failure::Transport(format!("invalid {table} endpoint: {err}")))?;
        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY, key.as_str()).bearer_auth(key);
        }
        Ok(builder)
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn send(builder: RequestBuilder) -> Result<(HeaderMap, Vec<u8>), Failure> {
    let response = builder.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok((headers, body.to_vec()))
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, Failure> {
    serde_json::from_slice(body)
        .map_err(|err| Failure::Decode(format!("invalid {what} payload: {err}")))
}

fn single_row<T>(rows: Vec<T>, what: &str) -> Result<T, Failure> {
    rows.into_iter()
        .next()
        .ok_or_else(|| Failure::Decode(format!("no {what} row returned")))
}

fn map_transport_error(error: reqwest::Error) -> Failure {
    if error.is_timeout() {
        Failure::Transport(format!("request timed out: {error}"))
    } else {
        Failure::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> Failure {
    let detail = serde_json::from_slice::<PostgrestErrorDto>(body)
        .map(|dto| dto.summary())
        .unwrap_or_else(|_| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Failure::Transport(message)
    } else {
        Failure::Status(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn total_from(headers: &HeaderMap, fallback: usize) -> u64 {
    headers
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_range_total)
        .unwrap_or_else(|| u64::try_from(fallback).unwrap_or(u64::MAX))
}

#[async_trait]
impl QuestionRepository for PostgrestStore {
    async fn list(
        &self,
        query: &QuestionListQuery,
    ) -> Result<Page<Question>, QuestionRepositoryError> {
        let builder = self
            .request(Method::GET, QUESTIONS)?
            .query(&question_list_params(query))
            .header(PREFER, PREFER_COUNT);
        let (headers, body) = send(builder).await?;
        let items: Vec<Question> = decode(&body, "question list")?;
        let total = total_from(&headers, items.len());
        debug!(returned = items.len(), total, "question page received");
        Ok(Page::new(items, total))
    }

    async fn find_by_id(
        &self,
        id: QuestionId,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let builder = self
            .request(Method::GET, QUESTIONS)?
            .query(&[("select", "*".to_owned()), ("id", format!("eq.{id}"))]);
        let (_, body) = send(builder).await?;
        let rows: Vec<Question> = decode(&body, "question")?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, question: &NewQuestion) -> Result<Question, QuestionRepositoryError> {
        let builder = self
            .request(Method::POST, QUESTIONS)?
            .header(PREFER, PREFER_REPRESENTATION)
            .json(question);
        let (_, body) = send(builder).await?;
        let rows: Vec<Question> = decode(&body, "inserted question")?;
        Ok(single_row(rows, "question")?)
    }
}

#[async_trait]
impl AnswerRepository for PostgrestStore {
    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Answer>, AnswerRepositoryError> {
        let builder = self
            .request(Method::GET, ANSWERS)?
            .query(&answer_list_params(question_id.get()));
        let (_, body) = send(builder).await?;
        Ok(decode(&body, "answer list")?)
    }

    async fn insert(&self, answer: &NewAnswer) -> Result<Answer, AnswerRepositoryError> {
        let builder = self
            .request(Method::POST, ANSWERS)?
            .header(PREFER, PREFER_REPRESENTATION)
            .json(answer);
        let (_, body) = send(builder).await?;
        let rows: Vec<Answer> = decode(&body, "inserted answer")?;
        Ok(single_row(rows, "answer")?)
    }
}

#[async_trait]
impl VoteRepository for PostgrestStore {
    async fn upsert(&self, vote: &VoteRecord) -> Result<(), VoteRepositoryError> {
        let (on_conflict, row) = vote_upsert(vote);
        let builder = self
            .request(Method::POST, VOTES)?
            .query(&[("on_conflict", on_conflict)])
            .header(PREFER, PREFER_MERGE)
            .json(&row);
        send(builder).await?;
        debug!(vote_target = %vote.target, "vote upserted");
        Ok(())
    }
}
