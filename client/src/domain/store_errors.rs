//! Mapping from port errors to domain errors.

use super::{Error, ErrorCode};
use super::ports::{
    AnswerRepositoryError, IdentityProviderError, QuestionRepositoryError, VoteRepositoryError,
};

pub(crate) fn from_question_store(error: QuestionRepositoryError) -> Error {
    match error {
        QuestionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("question store unavailable: {message}"))
        }
        QuestionRepositoryError::Query { message } => {
            Error::internal(format!("question store error: {message}"))
        }
        QuestionRepositoryError::Decode { message } => {
            Error::internal(format!("question store returned malformed data: {message}"))
        }
    }
}

pub(crate) fn from_answer_store(error: AnswerRepositoryError) -> Error {
    match error {
        AnswerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("answer store unavailable: {message}"))
        }
        AnswerRepositoryError::Query { message } => {
            Error::internal(format!("answer store error: {message}"))
        }
        AnswerRepositoryError::Decode { message } => {
            Error::internal(format!("answer store returned malformed data: {message}"))
        }
    }
}

pub(crate) fn from_vote_store(error: VoteRepositoryError) -> Error {
    match error {
        VoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("vote store unavailable: {message}"))
        }
        VoteRepositoryError::Query { message } => {
            Error::internal(format!("vote store error: {message}"))
        }
    }
}

/// Provider rejections keep the provider's own wording.
pub(crate) fn from_identity(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { message } => {
            Error::try_new(ErrorCode::Unauthorized, message)
                .unwrap_or_else(|_| Error::unauthorized("authentication failed"))
        }
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::NotSignedIn => Error::unauthorized("sign in to continue"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(QuestionRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(QuestionRepositoryError::query("bad filter"), ErrorCode::InternalError)]
    #[case(QuestionRepositoryError::decode("eof"), ErrorCode::InternalError)]
    fn question_store_errors_map_to_codes(
        #[case] error: QuestionRepositoryError,
        #[case] code: ErrorCode,
    ) {
        assert_eq!(from_question_store(error).code(), code);
    }

    #[rstest]
    fn identity_rejections_are_verbatim() {
        let error = from_identity(IdentityProviderError::rejected("INVALID_PASSWORD"));
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "INVALID_PASSWORD");
    }

    #[rstest]
    fn blank_identity_rejections_get_a_generic_message() {
        let error = from_identity(IdentityProviderError::rejected(" "));
        assert_eq!(error.message(), "authentication failed");
    }
}
