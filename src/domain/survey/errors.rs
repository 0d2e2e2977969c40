//! Survey-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | NotEligible | 403 |
//! | AlreadySubmitted | 409 |
//! | SurveyLocked | 409 |
//! | SectionInUse | 409 |
//! | SurveyChanged | 409 |
//! | ValidationFailed | 422 |
//! | InvalidDefinition | 400 |
//! | StorageUnavailable | 503 |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, ValidationError};

/// Why a single raw answer was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AnswerRejection {
    /// A required question received no value.
    MissingRequiredAnswer,
    /// The value is not one of the configured choices.
    InvalidChoice { given: String },
    /// The value is not an integer inside the likert scale.
    OutOfRange { given: String, min: i32, max: i32 },
}

impl fmt::Display for AnswerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerRejection::MissingRequiredAnswer => write!(f, "an answer is required"),
            AnswerRejection::InvalidChoice { given } => {
                write!(f, "'{}' is not one of the available choices", given)
            }
            AnswerRejection::OutOfRange { given, min, max } => {
                write!(f, "'{}' is not a whole number between {} and {}", given, min, max)
            }
        }
    }
}

/// A rejection tied to the question it was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerViolation {
    pub question_id: QuestionId,
    #[serde(flatten)]
    pub rejection: AnswerRejection,
}

impl AnswerViolation {
    pub fn new(question_id: QuestionId, rejection: AnswerRejection) -> Self {
        Self {
            question_id,
            rejection,
        }
    }
}

/// Errors surfaced by survey command and query handlers.
///
/// All variants are recoverable results; none should terminate the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    /// Survey is closed, expired, or not assigned to the respondent's section.
    #[error("Survey is not open to this respondent")]
    NotEligible,

    /// A response for this survey and respondent already exists.
    #[error("A response has already been submitted for this survey")]
    AlreadySubmitted,

    /// One or more answers failed validation; nothing was written.
    #[error("{} answer(s) failed validation", .0.len())]
    ValidationFailed(Vec<AnswerViolation>),

    /// The question set cannot change once responses exist.
    #[error("Survey questions cannot change after responses have been submitted")]
    SurveyLocked,

    /// The section still has students or survey assignments.
    #[error("Section is still in use")]
    SectionInUse,

    /// The survey was edited between validation and the write. Safe to retry.
    #[error("Survey changed while the response was being submitted")]
    SurveyChanged,

    /// Referenced entity does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Acting respondent may not perform the operation.
    #[error("Permission denied")]
    Forbidden,

    /// A survey, question or section definition is malformed.
    #[error("Invalid {field}: {message}")]
    InvalidDefinition { field: String, message: String },

    /// The store could not complete the operation. Safe to retry.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl SurveyError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        SurveyError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        SurveyError::InvalidDefinition {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SurveyError::NotEligible => ErrorCode::NotEligible,
            SurveyError::AlreadySubmitted => ErrorCode::AlreadySubmitted,
            SurveyError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            SurveyError::SurveyLocked => ErrorCode::SurveyLocked,
            SurveyError::SectionInUse => ErrorCode::SectionInUse,
            SurveyError::SurveyChanged => ErrorCode::SurveyChanged,
            SurveyError::NotFound { resource, .. } => match *resource {
                "Section" => ErrorCode::SectionNotFound,
                "Respondent" => ErrorCode::RespondentNotFound,
                "Question" => ErrorCode::QuestionNotFound,
                "Response" => ErrorCode::ResponseNotFound,
                _ => ErrorCode::SurveyNotFound,
            },
            SurveyError::Forbidden => ErrorCode::Forbidden,
            SurveyError::InvalidDefinition { .. } => ErrorCode::ValidationFailed,
            SurveyError::StorageUnavailable(_) => ErrorCode::DatabaseError,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SurveyError::StorageUnavailable(_) | SurveyError::SurveyChanged
        )
    }
}

impl From<ValidationError> for SurveyError {
    fn from(err: ValidationError) -> Self {
        SurveyError::InvalidDefinition {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for SurveyError {
    fn from(err: DomainError) -> Self {
        let id = err.details.get("id").cloned().unwrap_or_default();
        match err.code {
            ErrorCode::NotEligible => SurveyError::NotEligible,
            ErrorCode::AlreadySubmitted => SurveyError::AlreadySubmitted,
            ErrorCode::SurveyLocked => SurveyError::SurveyLocked,
            ErrorCode::SectionInUse => SurveyError::SectionInUse,
            ErrorCode::SurveyChanged => SurveyError::SurveyChanged,
            ErrorCode::Forbidden => SurveyError::Forbidden,
            ErrorCode::SectionNotFound => SurveyError::not_found("Section", id),
            ErrorCode::RespondentNotFound => SurveyError::not_found("Respondent", id),
            ErrorCode::SurveyNotFound => SurveyError::not_found("Survey", id),
            ErrorCode::QuestionNotFound => SurveyError::not_found("Question", id),
            ErrorCode::ResponseNotFound => SurveyError::not_found("Response", id),
            ErrorCode::ValidationFailed | ErrorCode::DuplicateSectionCode => {
                SurveyError::InvalidDefinition {
                    field: err.details.get("field").cloned().unwrap_or_default(),
                    message: err.message,
                }
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                SurveyError::StorageUnavailable(err.message)
            }
        }
    }
}
