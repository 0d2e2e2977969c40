//! GetSurveyHandler - Query handler returning a survey with its questions.

use std::sync::Arc;

use crate::domain::foundation::{RespondentId, SurveyId};
use crate::domain::survey::{Survey, SurveyError};
use crate::ports::{RespondentRepository, SurveyRepository};

use super::super::loaders::{load_respondent, load_survey};

#[derive(Debug, Clone)]
pub struct GetSurveyQuery {
    pub viewer_id: RespondentId,
    pub survey_id: SurveyId,
}

/// Visible to the owner and to students of an assigned section. Closed and
/// overdue surveys stay readable so students can review what they answered.
pub struct GetSurveyHandler {
    respondents: Arc<dyn RespondentRepository>,
    surveys: Arc<dyn SurveyRepository>,
}

impl GetSurveyHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        surveys: Arc<dyn SurveyRepository>,
    ) -> Self {
        Self {
            respondents,
            surveys,
        }
    }

    pub async fn handle(&self, query: GetSurveyQuery) -> Result<Survey, SurveyError> {
        let viewer = load_respondent(self.respondents.as_ref(), &query.viewer_id).await?;
        let survey = load_survey(self.surveys.as_ref(), &query.survey_id).await?;

        let assigned = viewer
            .section_id()
            .is_some_and(|section_id| survey.is_assigned_to(section_id));
        if survey.is_owned_by(viewer.id()) || assigned {
            Ok(survey)
        } else {
            Err(SurveyError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{SectionId, Timestamp};
    use crate::domain::respondent::Respondent;
    use crate::domain::section::Section;
    use crate::ports::SectionRepository;

    #[tokio::test]
    async fn owner_and_assigned_students_can_read() {
        let store = Arc::new(InMemoryStore::new());
        let now = Timestamp::now();
        let assigned = Section::new(SectionId::new(), "Period 1", "P1", "", now).unwrap();
        let other = Section::new(SectionId::new(), "Period 2", "P2", "", now).unwrap();
        SectionRepository::save(store.as_ref(), &assigned).await.unwrap();
        SectionRepository::save(store.as_ref(), &other).await.unwrap();

        let teacher = Respondent::teacher(RespondentId::new(), "Ms. Vega");
        let inside = Respondent::student(RespondentId::new(), "Ana", *assigned.id());
        let outside = Respondent::student(RespondentId::new(), "Ben", *other.id());
        for r in [&teacher, &inside, &outside] {
            RespondentRepository::save(store.as_ref(), r).await.unwrap();
        }

        let mut survey = Survey::new(SurveyId::new(), *teacher.id(), "Check-in", "", now).unwrap();
        survey.assign_sections([*assigned.id()], now);
        SurveyRepository::save(store.as_ref(), &survey).await.unwrap();

        let handler = GetSurveyHandler::new(store.clone(), store);
        let query = |viewer: &Respondent| GetSurveyQuery {
            viewer_id: *viewer.id(),
            survey_id: *survey.id(),
        };

        assert!(handler.handle(query(&teacher)).await.is_ok());
        assert!(handler.handle(query(&inside)).await.is_ok());
        assert_eq!(
            handler.handle(query(&outside)).await.unwrap_err(),
            SurveyError::Forbidden
        );
    }
}
