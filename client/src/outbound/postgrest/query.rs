//! PostgREST query-string and header construction.
//!
//! Kept free of I/O so the dialect can be tested without a server.

use crate::domain::{QuestionListQuery, QuestionSort, SearchQuery, VoteRecord, VoteTarget};

use super::dto::VoteRowDto;

pub(super) const QUESTIONS: &str = "questions";
pub(super) const ANSWERS: &str = "answers";
pub(super) const VOTES: &str = "votes";

pub(super) const PREFER_COUNT: &str = "count=exact";
pub(super) const PREFER_REPRESENTATION: &str = "return=representation";
pub(super) const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";

const ANSWER_COUNT_COLUMN: &str = "answer_count";

/// Query parameters for one page of the question list.
pub(super) fn question_list_params(query: &QuestionListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_owned())];
    if let Some(search) = &query.search {
        params.push(("or", search_filter(search)));
    }
    if query.sort == QuestionSort::Unanswered {
        params.push((ANSWER_COUNT_COLUMN, "eq.0".to_owned()));
    }
    let order = match query.sort {
        QuestionSort::Newest | QuestionSort::Unanswered => "created_at.desc,id.desc",
        QuestionSort::MostVoted => "votes.desc,created_at.desc,id.desc",
    };
    params.push(("order", order.to_owned()));
    params.push(("offset", query.page.offset().to_string()));
    params.push(("limit", query.page.limit().to_string()));
    params
}

/// `or` filter matching title or description case-insensitively, or a tag.
///
/// Values are double-quoted so commas and parentheses in the search text
/// do not break the filter grammar. Pattern characters in the `ilike`
/// operand are escaped so the text matches as a plain substring.
pub(super) fn search_filter(search: &SearchQuery) -> String {
    let pattern = quote(&escape_like(search.as_str()));
    let tag = quote(search.as_str());
    format!(
        "(title.ilike.\"*{pattern}*\",description.ilike.\"*{pattern}*\",tags.cs.{{\"{tag}\"}})"
    )
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_' | '*') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn quote(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('"', "\\\"")
}

/// Query parameters for answers to one question in display order.
pub(super) fn answer_list_params(question_id: i64) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_owned()),
        ("question_id", format!("eq.{question_id}")),
        ("order", "is_accepted.desc,votes.desc".to_owned()),
    ]
}

/// Conflict target and row for a vote upsert.
pub(super) fn vote_upsert(vote: &VoteRecord) -> (&'static str, VoteRowDto) {
    let (on_conflict, question_id, answer_id) = match vote.target {
        VoteTarget::Question(id) => ("user_id,question_id", Some(id.get()), None),
        VoteTarget::Answer(id) => ("user_id,answer_id", None, Some(id.get())),
    };
    (
        on_conflict,
        VoteRowDto {
            user_id: vote.user_id.to_string(),
            question_id,
            answer_id,
            vote_type: vote.direction.delta(),
        },
    )
}

/// Total from a `Content-Range` header such as `0-4/23` or `*/0`.
pub(super) fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
