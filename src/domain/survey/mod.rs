//! Survey domain module.
//!
//! Contains the Survey aggregate with its ordered questions, the Response and
//! Answer records submitted against it, and the pure services that decide
//! eligibility and validate raw answers.
//!
//! # Lifecycle
//!
//! A survey is authored by a teacher. Its settings and section assignments
//! stay editable for its whole life, but the question set is frozen as soon
//! as the first response exists.

mod aggregate;
mod eligibility;
mod errors;
mod question;
mod response;
mod validator;

pub use aggregate::{QuestionDraft, Survey, SurveySettings, MAX_TITLE_LENGTH};
pub use eligibility::{EligibilityResolver, Ineligibility};
pub use errors::{AnswerRejection, AnswerViolation, SurveyError};
pub use question::{
    LikertScale, Question, QuestionKind, QuestionType, ScaleLabel, DEFAULT_LIKERT_MAX,
    DEFAULT_LIKERT_MIN, MAX_CHOICE_LENGTH, MAX_LIKERT_SPAN,
};
pub use response::{Answer, AnswerValue, Response};
pub use validator::AnswerValidator;
