//! Response repository port (write side).
//!
//! The only path through which responses and answers are written.

use crate::domain::foundation::{DomainError, RespondentId, SurveyId};
use crate::domain::survey::{Answer, Response};
use async_trait::async_trait;

/// Repository port for response submission.
///
/// Implementations must ensure:
/// - `submit` writes the response and all its answers atomically
/// - `submit` compares the survey revision while holding the lock that
///   survey edits also take, so answers are never stored against a
///   question set other than the one they were validated against
/// - at most one response per (survey, respondent), enforced by the store
/// - at most one answer per (response, question)
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Atomically insert a response and its answers.
    ///
    /// `survey_revision` is the revision of the survey the answers were
    /// validated against.
    ///
    /// # Errors
    ///
    /// - `SurveyChanged` if the stored survey revision differs
    /// - `AlreadySubmitted` if a response for the pair exists, including one
    ///   committed by a concurrent call
    /// - `SurveyNotFound` if the survey was deleted meanwhile
    /// - `DatabaseError` on persistence failure; nothing was written
    async fn submit(
        &self,
        response: &Response,
        answers: &[Answer],
        survey_revision: u32,
    ) -> Result<(), DomainError>;

    /// Whether the respondent already has a response for the survey.
    async fn exists_for(
        &self,
        survey_id: &SurveyId,
        respondent_id: &RespondentId,
    ) -> Result<bool, DomainError>;

    /// Number of responses stored for a survey.
    async fn count_for_survey(&self, survey_id: &SurveyId) -> Result<u32, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ResponseRepository) {}
    }
}
