//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the timestamp value object, and the error types
//! that form the vocabulary of the survey domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AnswerId, QuestionId, RespondentId, ResponseId, SectionId, SurveyId};
pub use timestamp::Timestamp;
