//! ListEligibleSurveysHandler - Query handler for the surveys a respondent
//! can act on right now.
//!
//! Students get the open, assigned surveys they have not completed yet.
//! Teachers get every survey they created, unfiltered.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::loaders::load_respondent;
use crate::domain::foundation::{RespondentId, SurveyId, Timestamp};
use crate::domain::respondent::RespondentRole;
use crate::domain::survey::{EligibilityResolver, Survey, SurveyError};
use crate::ports::{RespondentRepository, ResponseReader, SurveyRepository};

/// Query for listing surveys.
#[derive(Debug, Clone)]
pub struct ListEligibleSurveysQuery {
    pub respondent_id: RespondentId,
    pub now: Timestamp,
}

/// List entry for one survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub question_count: u32,
}

impl From<&Survey> for SurveySummary {
    fn from(survey: &Survey) -> Self {
        Self {
            id: *survey.id(),
            title: survey.title().to_string(),
            description: survey.description().to_string(),
            is_active: survey.is_active(),
            due_date: survey.due_date().copied(),
            created_at: *survey.created_at(),
            question_count: survey.questions().len() as u32,
        }
    }
}

pub struct ListEligibleSurveysHandler {
    respondents: Arc<dyn RespondentRepository>,
    surveys: Arc<dyn SurveyRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl ListEligibleSurveysHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        surveys: Arc<dyn SurveyRepository>,
        reader: Arc<dyn ResponseReader>,
    ) -> Self {
        Self {
            respondents,
            surveys,
            reader,
        }
    }

    pub async fn handle(
        &self,
        query: ListEligibleSurveysQuery,
    ) -> Result<Vec<SurveySummary>, SurveyError> {
        let respondent = load_respondent(self.respondents.as_ref(), &query.respondent_id).await?;

        let surveys = match respondent.role() {
            RespondentRole::Teacher => self.surveys.find_by_creator(respondent.id()).await?,
            RespondentRole::Student { section_id } => {
                let candidates = self.surveys.find_assigned_to_section(section_id).await?;
                let completed = self.reader.completed_survey_ids(respondent.id()).await?;
                EligibilityResolver::eligible_surveys(&respondent, candidates, &completed, &query.now)
            }
        };

        Ok(surveys.iter().map(SurveySummary::from).collect())
    }
}
