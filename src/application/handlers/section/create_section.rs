//! CreateSectionHandler - Command handler for creating class sections.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{SectionId, Timestamp};
use crate::domain::section::Section;
use crate::domain::survey::SurveyError;
use crate::ports::SectionRepository;

#[derive(Debug, Clone)]
pub struct CreateSectionCommand {
    pub name: String,
    pub code: String,
    pub description: String,
    pub now: Timestamp,
}

pub struct CreateSectionHandler {
    sections: Arc<dyn SectionRepository>,
}

impl CreateSectionHandler {
    pub fn new(sections: Arc<dyn SectionRepository>) -> Self {
        Self { sections }
    }

    /// Creates a section. Codes are unique; a clash is reported as an
    /// invalid `code`.
    pub async fn handle(&self, cmd: CreateSectionCommand) -> Result<Section, SurveyError> {
        let section = Section::new(SectionId::new(), cmd.name, cmd.code, cmd.description, cmd.now)?;
        self.sections.save(&section).await?;

        info!(section_id = %section.id(), code = section.code(), "Section created");
        Ok(section)
    }
}
