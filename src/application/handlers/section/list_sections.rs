//! ListSectionsHandler - Query handler listing sections by name.

use std::sync::Arc;

use crate::domain::section::Section;
use crate::domain::survey::SurveyError;
use crate::ports::SectionRepository;

pub struct ListSectionsHandler {
    sections: Arc<dyn SectionRepository>,
}

impl ListSectionsHandler {
    pub fn new(sections: Arc<dyn SectionRepository>) -> Self {
        Self { sections }
    }

    pub async fn handle(&self) -> Result<Vec<Section>, SurveyError> {
        Ok(self.sections.list_all().await?)
    }
}
