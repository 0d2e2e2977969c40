//! Survey repository port.
//!
//! Persists the Survey aggregate together with its questions and section
//! assignments.
//!
//! # Design
//!
//! - **Split updates**: settings and assignments are written separately from
//!   the question set, because only the latter is locked by responses
//! - **Lock enforced at the store**: `update_questions` re-checks for
//!   responses inside its own transaction, so a submission racing an edit
//!   cannot slip between the handler's check and the write

use crate::domain::foundation::{DomainError, RespondentId, SectionId, SurveyId};
use crate::domain::survey::Survey;
use async_trait::async_trait;

#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Save a new survey with its questions and assignments.
    ///
    /// # Errors
    ///
    /// - `SectionNotFound` if an assigned section doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn save(&self, survey: &Survey) -> Result<(), DomainError>;

    /// Persist title, description, active flag, due date and the assignment
    /// set. Questions are left untouched.
    ///
    /// # Errors
    ///
    /// - `SurveyNotFound` if the survey doesn't exist
    /// - `SectionNotFound` if an assigned section doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_settings(&self, survey: &Survey) -> Result<(), DomainError>;

    /// Replace the stored question set with the survey's current questions.
    ///
    /// # Errors
    ///
    /// - `SurveyNotFound` if the survey doesn't exist
    /// - `SurveyLocked` if any response exists for the survey
    /// - `DatabaseError` on persistence failure
    async fn update_questions(&self, survey: &Survey) -> Result<(), DomainError>;

    /// Find a survey by its ID, questions in order.
    async fn find_by_id(&self, id: &SurveyId) -> Result<Option<Survey>, DomainError>;

    /// Find all surveys created by a respondent, newest first.
    async fn find_by_creator(&self, creator_id: &RespondentId)
        -> Result<Vec<Survey>, DomainError>;

    /// Find all surveys assigned to a section, regardless of state.
    async fn find_assigned_to_section(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Survey>, DomainError>;

    /// Delete a survey and everything it owns: answers, responses,
    /// assignments and questions, in one transaction.
    ///
    /// # Errors
    ///
    /// - `SurveyNotFound` if the survey doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &SurveyId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SurveyRepository) {}
    }
}
