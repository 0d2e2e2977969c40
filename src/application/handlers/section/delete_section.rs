//! DeleteSectionHandler - Command handler for removing an unused section.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SectionId;
use crate::domain::survey::SurveyError;
use crate::ports::SectionRepository;

#[derive(Debug, Clone)]
pub struct DeleteSectionCommand {
    pub section_id: SectionId,
}

/// Deletes a section. The store refuses with `SectionInUse` while students
/// belong to it or surveys are assigned to it.
pub struct DeleteSectionHandler {
    sections: Arc<dyn SectionRepository>,
}

impl DeleteSectionHandler {
    pub fn new(sections: Arc<dyn SectionRepository>) -> Self {
        Self { sections }
    }

    pub async fn handle(&self, cmd: DeleteSectionCommand) -> Result<(), SurveyError> {
        self.sections.delete(&cmd.section_id).await?;
        info!(section_id = %cmd.section_id, "Section deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{RespondentId, Timestamp};
    use crate::domain::respondent::Respondent;
    use crate::domain::section::Section;
    use crate::ports::RespondentRepository;

    #[tokio::test]
    async fn section_with_students_is_in_use() {
        let store = Arc::new(InMemoryStore::new());
        let section = Section::new(SectionId::new(), "Art", "ART", "", Timestamp::now()).unwrap();
        SectionRepository::save(store.as_ref(), &section).await.unwrap();
        let student = Respondent::student(RespondentId::new(), "Noor", *section.id());
        RespondentRepository::save(store.as_ref(), &student).await.unwrap();

        let handler = DeleteSectionHandler::new(store);
        let err = handler
            .handle(DeleteSectionCommand {
                section_id: *section.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SurveyError::SectionInUse);
    }

    #[tokio::test]
    async fn unused_section_is_deleted() {
        let store = Arc::new(InMemoryStore::new());
        let section = Section::new(SectionId::new(), "Music", "MUS", "", Timestamp::now()).unwrap();
        SectionRepository::save(store.as_ref(), &section).await.unwrap();

        DeleteSectionHandler::new(store.clone())
            .handle(DeleteSectionCommand {
                section_id: *section.id(),
            })
            .await
            .unwrap();
        assert!(SectionRepository::find_by_id(store.as_ref(), section.id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_section_is_not_found() {
        let handler = DeleteSectionHandler::new(Arc::new(InMemoryStore::new()));
        let err = handler
            .handle(DeleteSectionCommand {
                section_id: SectionId::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::NotFound { resource: "Section", .. }));
    }
}
