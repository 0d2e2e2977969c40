//! Handlers for survey changes that stay allowed after responses exist:
//! settings (title, description, active flag, due date) and section
//! assignments.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::foundation::{RespondentId, SectionId, SurveyId, Timestamp};
use crate::domain::survey::{Survey, SurveyError, SurveySettings};
use crate::ports::{SectionRepository, SurveyRepository};

use super::create_survey::require_sections;

#[derive(Debug, Clone)]
pub struct UpdateSurveySettingsCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    pub settings: SurveySettings,
    pub now: Timestamp,
}

pub struct UpdateSurveySettingsHandler {
    surveys: Arc<dyn SurveyRepository>,
}

impl UpdateSurveySettingsHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>) -> Self {
        Self { surveys }
    }

    pub async fn handle(&self, cmd: UpdateSurveySettingsCommand) -> Result<Survey, SurveyError> {
        let mut survey =
            load_owned_survey(self.surveys.as_ref(), &cmd.survey_id, &cmd.teacher_id).await?;
        survey.update_settings(cmd.settings, cmd.now)?;
        self.surveys.update_settings(&survey).await?;

        info!(
            survey_id = %cmd.survey_id,
            is_active = survey.is_active(),
            "Survey settings updated"
        );
        Ok(survey)
    }
}

#[derive(Debug, Clone)]
pub struct AssignSectionsCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
    /// Replaces the current assignment set.
    pub section_ids: Vec<SectionId>,
    pub now: Timestamp,
}

pub struct AssignSectionsHandler {
    sections: Arc<dyn SectionRepository>,
    surveys: Arc<dyn SurveyRepository>,
}

impl AssignSectionsHandler {
    pub fn new(sections: Arc<dyn SectionRepository>, surveys: Arc<dyn SurveyRepository>) -> Self {
        Self { sections, surveys }
    }

    pub async fn handle(&self, cmd: AssignSectionsCommand) -> Result<Survey, SurveyError> {
        let mut survey =
            load_owned_survey(self.surveys.as_ref(), &cmd.survey_id, &cmd.teacher_id).await?;
        require_sections(self.sections.as_ref(), &cmd.section_ids).await?;

        survey.assign_sections(cmd.section_ids, cmd.now);
        self.surveys.update_settings(&survey).await?;

        info!(
            survey_id = %cmd.survey_id,
            sections = survey.section_ids().len(),
            "Survey sections assigned"
        );
        Ok(survey)
    }
}
