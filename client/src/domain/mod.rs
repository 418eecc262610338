//! Domain types, services, and driven ports.
//!
//! Purpose: hold the client's behaviour independent of any hosted service.
//! Adapters in [`crate::outbound`] implement the ports; the binary wires
//! them together.
//!
//! Public surface:
//! - `Error` and `ErrorCode`: transport-agnostic failures.
//! - Questions, answers, users, and votes with their validated drafts.
//! - `QuestionListController`: the paginated, searchable, debounced list.
//! - `VoteLedger` and `VotingService`: same-session vote bookkeeping.
//! - `AskQuestionService`, `QuestionDetailService`, `AuthService`.

pub mod answer;
pub mod ask_question_service;
pub mod auth_service;
pub mod debounce;
pub mod error;
pub mod ports;
pub mod question;
pub mod question_detail_service;
pub mod question_list;
mod store_errors;
pub mod time_ago;
pub mod user;
pub mod vote;
pub mod vote_ledger;
pub mod voting_service;

pub use self::answer::{Answer, AnswerDraft, AnswerId, NewAnswer, sort_for_display};
pub use self::ask_question_service::AskQuestionService;
pub use self::auth_service::AuthService;
pub use self::debounce::Debouncer;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::question::{
    DraftValidationError, NewQuestion, Question, QuestionDraft, QuestionId, QuestionListQuery,
    QuestionSort, SearchQuery, UnknownSort, parse_tags,
};
pub use self::question_detail_service::{AnswerView, QuestionDetail, QuestionDetailService};
pub use self::question_list::{
    DEFAULT_DEBOUNCE, EmptyState, ListSettings, QuestionListController, QuestionListView,
    StaleResponsePolicy,
};
pub use self::time_ago::time_ago;
pub use self::user::{
    AuthValidationError, FALLBACK_AUTHOR, Registration, SessionUser, SignInCredentials, UserId,
};
pub use self::vote::{VoteDirection, VoteRecord, VoteTarget};
pub use self::vote_ledger::{AlreadyVoted, VoteLedger};
pub use self::voting_service::VotingService;
