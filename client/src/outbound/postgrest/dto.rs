//! Wire shapes specific to the PostgREST dialect.
//!
//! Question and answer rows decode straight into the domain types; only the
//! vote row and the error envelope need their own shapes.

use serde::{Deserialize, Serialize};

/// Row written by a vote upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct VoteRowDto {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<i64>,
    pub vote_type: i64,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
pub(super) struct PostgrestErrorDto {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl PostgrestErrorDto {
    pub(super) fn summary(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({code})", self.message),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_votes_omit_the_answer_column() {
        let row = VoteRowDto {
            user_id: "uid".into(),
            question_id: Some(3),
            answer_id: None,
            vote_type: 1,
        };
        assert_eq!(
            serde_json::to_value(&row).expect("serialise"),
            json!({ "user_id": "uid", "question_id": 3, "vote_type": 1 })
        );
    }

    #[test]
    fn error_summary_includes_code_when_present() {
        let dto: PostgrestErrorDto = serde_json::from_value(json!({
            "message": "permission denied for table votes",
            "code": "42501",
            "hint": null
        }))
        .expect("decode");
        assert_eq!(dto.summary(), "permission denied for table votes (42501)");
    }
}
