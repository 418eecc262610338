//! Render-ready snapshot of the question list.

use serde::Serialize;

use crate::domain::{Error, Question, QuestionSort};

/// Why the list shows no questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyState {
    /// No search is active and the store holds no questions.
    NoQuestions,
    /// The active search matched nothing.
    NoResults { query: String },
    /// Questions exist but the selected page lies beyond the last one.
    PastLastPage { last_page: u32 },
}

impl EmptyState {
    /// Text shown in place of the list.
    pub fn message(&self) -> String {
        match self {
            Self::NoQuestions => "No questions yet. Be the first to ask one!".to_owned(),
            Self::NoResults { query } => format!("No questions match \"{query}\"."),
            Self::PastLastPage { last_page } => {
                format!("There are no questions past page {last_page}.")
            }
        }
    }

    /// Whether a "clear search" control should be offered.
    pub const fn offers_clear_search(&self) -> bool {
        matches!(self, Self::NoResults { .. })
    }
}

/// Everything a renderer needs to draw the list and its pager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionListView {
    pub items: Vec<Question>,
    pub total_items: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub visible_pages: Vec<u32>,
    pub has_previous: bool,
    pub has_next: bool,
    /// True while any fetch the controller issued is outstanding.
    pub loading: bool,
    pub error: Option<Error>,
    /// Search box contents, committed or not.
    pub search_input: String,
    /// Query the current items were filtered by.
    pub active_search: Option<String>,
    pub sort: QuestionSort,
    pub empty_state: Option<EmptyState>,
}

impl QuestionListView {
    pub(super) fn empty_state_for(
        loading: bool,
        items: &[Question],
        total_items: u64,
        total_pages: u32,
        active_search: Option<&str>,
    ) -> Option<EmptyState> {
        if loading || !items.is_empty() {
            return None;
        }
        if total_items > 0 {
            return Some(EmptyState::PastLastPage {
                last_page: total_pages.max(1),
            });
        }
        Some(match active_search {
            Some(query) => EmptyState::NoResults {
                query: query.to_owned(),
            },
            None => EmptyState::NoQuestions,
        })
    }
}
