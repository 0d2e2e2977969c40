//! Respondent repository port.
//!
//! Respondents are provisioned by an external identity system in most
//! deployments; this port only covers what the survey engine reads and the
//! registration path it exposes.

use crate::domain::foundation::{DomainError, RespondentId, SectionId};
use crate::domain::respondent::Respondent;
use async_trait::async_trait;

#[async_trait]
pub trait RespondentRepository: Send + Sync {
    /// Save a new respondent.
    ///
    /// # Errors
    ///
    /// - `SectionNotFound` if a student's section doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn save(&self, respondent: &Respondent) -> Result<(), DomainError>;

    /// Find a respondent by its ID.
    async fn find_by_id(&self, id: &RespondentId) -> Result<Option<Respondent>, DomainError>;

    /// Count students currently belonging to a section.
    async fn count_students_in_section(&self, section_id: &SectionId) -> Result<u32, DomainError>;
}
