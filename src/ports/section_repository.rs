//! Section repository port.

use crate::domain::foundation::{DomainError, SectionId};
use crate::domain::section::Section;
use async_trait::async_trait;

/// Repository port for sections.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Save a new section.
    ///
    /// # Errors
    ///
    /// - `DuplicateSectionCode` if another section already uses the code
    /// - `DatabaseError` on persistence failure
    async fn save(&self, section: &Section) -> Result<(), DomainError>;

    /// Find a section by its ID.
    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, DomainError>;

    /// Find every section among `ids` that exists. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[SectionId]) -> Result<Vec<Section>, DomainError>;

    /// List all sections ordered by name.
    async fn list_all(&self) -> Result<Vec<Section>, DomainError>;

    /// Delete a section.
    ///
    /// # Errors
    ///
    /// - `SectionNotFound` if the section doesn't exist
    /// - `SectionInUse` while students belong to it or surveys are assigned to it
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &SectionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SectionRepository) {}
    }
}
