//! Questions, question drafts, and list queries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};

/// Store-assigned question identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A question as stored.
///
/// Field names follow the store's snake_case columns. `answer_count` is
/// optional on the wire and defaults to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    /// Body in the markdown subset.
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub views: i64,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "answers")]
    pub answer_count: u32,
}

/// Validation errors for question and answer drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    EmptyTitle,
    EmptyDescription,
    EmptyContent,
}

impl fmt::Display for DraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyContent => write!(f, "answer must not be empty"),
        }
    }
}

impl std::error::Error for DraftValidationError {}

/// Raw ask-question form input.
///
/// The draft is never consumed by validation, so a failed submission
/// leaves it intact for another attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub title: String,
    pub description: String,
    /// Comma-separated tag list as typed.
    pub tags_input: String,
}

impl QuestionDraft {
    /// Build a draft from its three inputs.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags_input: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags_input: tags_input.into(),
        }
    }

    /// Whether the submit control is enabled.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    /// Validate the draft and attribute it to `author`.
    ///
    /// # Examples
    /// ```
    /// use stackit_client::domain::QuestionDraft;
    ///
    /// let draft = QuestionDraft::new(" Title ", "Body", "rust, tokio,, rust");
    /// let question = draft.validate("ada").expect("valid draft");
    /// assert_eq!(question.title, "Title");
    /// assert_eq!(question.tags, vec!["rust", "tokio"]);
    /// ```
    pub fn validate(&self, author: impl Into<String>) -> Result<NewQuestion, DraftValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(DraftValidationError::EmptyDescription);
        }
        Ok(NewQuestion {
            title: title.to_owned(),
            description: self.description.clone(),
            tags: parse_tags(&self.tags_input),
            author: author.into(),
        })
    }
}

/// Split a comma-separated tag list, trimming each entry and dropping blanks
/// and repeats.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

/// Validated question ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
}

/// Ordering and filtering applied to the question list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Questions without answers, most recent first.
    Unanswered,
    /// Highest vote total first.
    MostVoted,
}

impl QuestionSort {
    /// Every sort mode in menu order.
    pub const ALL: [Self; 3] = [Self::Newest, Self::Unanswered, Self::MostVoted];

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Unanswered => "Unanswered",
            Self::MostVoted => "Most Voted",
        }
    }

    /// Command-line and wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Unanswered => "unanswered",
            Self::MostVoted => "most-voted",
        }
    }
}

impl fmt::Display for QuestionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort `{0}`; expected newest, unanswered, or most-voted")]
pub struct UnknownSort(String);

impl FromStr for QuestionSort {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSort(s.to_owned()))
    }
}

/// Non-blank search text, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Parse raw input; blank input means "no search".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// The trimmed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match over title and description, or an
    /// exact case-insensitive tag match.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use stackit_client::domain::{Question, QuestionId, SearchQuery};
    ///
    /// let now = Utc::now();
    /// let question = Question {
    ///     id: QuestionId::new(1),
    ///     title: "Borrow checker woes".into(),
    ///     description: "Why does this not compile?".into(),
    ///     tags: vec!["rust".into()],
    ///     votes: 0,
    ///     views: 0,
    ///     author: "ada".into(),
    ///     created_at: now,
    ///     updated_at: now,
    ///     answer_count: 0,
    /// };
    /// assert!(SearchQuery::parse("BORROW").expect("query").matches(&question));
    /// assert!(SearchQuery::parse("Rust").expect("query").matches(&question));
    /// assert!(!SearchQuery::parse("rus").expect("query").matches(&question));
    /// ```
    pub fn matches(&self, question: &Question) -> bool {
        let needle = self.0.to_lowercase();
        question.title.to_lowercase().contains(&needle)
            || question.description.to_lowercase().contains(&needle)
            || question.tags.iter().any(|tag| tag.to_lowercase() == needle)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page request against the question collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionListQuery {
    pub page: PageRequest,
    pub search: Option<SearchQuery>,
    pub sort: QuestionSort,
}
