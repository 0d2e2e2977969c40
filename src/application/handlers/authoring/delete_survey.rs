//! DeleteSurveyHandler - Command handler for removing a survey and
//! everything it owns.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::loaders::load_owned_survey;
use crate::domain::foundation::{RespondentId, SurveyId};
use crate::domain::survey::SurveyError;
use crate::ports::SurveyRepository;

#[derive(Debug, Clone)]
pub struct DeleteSurveyCommand {
    pub teacher_id: RespondentId,
    pub survey_id: SurveyId,
}

pub struct DeleteSurveyHandler {
    surveys: Arc<dyn SurveyRepository>,
}

impl DeleteSurveyHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>) -> Self {
        Self { surveys }
    }

    /// Deletes answers, responses, assignments, questions and the survey,
    /// in one transaction.
    pub async fn handle(&self, cmd: DeleteSurveyCommand) -> Result<(), SurveyError> {
        let survey =
            load_owned_survey(self.surveys.as_ref(), &cmd.survey_id, &cmd.teacher_id).await?;
        self.surveys.delete(survey.id()).await?;

        info!(survey_id = %cmd.survey_id, "Survey deleted");
        Ok(())
    }
}
