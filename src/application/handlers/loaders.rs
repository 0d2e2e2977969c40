//! Lookups shared by several handlers.

use crate::domain::foundation::{RespondentId, SurveyId};
use crate::domain::respondent::Respondent;
use crate::domain::survey::{Survey, SurveyError};
use crate::ports::{RespondentRepository, SurveyRepository};

pub(crate) async fn load_respondent(
    respondents: &dyn RespondentRepository,
    id: &RespondentId,
) -> Result<Respondent, SurveyError> {
    respondents
        .find_by_id(id)
        .await?
        .ok_or_else(|| SurveyError::not_found("Respondent", id))
}

pub(crate) async fn load_survey(
    surveys: &dyn SurveyRepository,
    id: &SurveyId,
) -> Result<Survey, SurveyError> {
    surveys
        .find_by_id(id)
        .await?
        .ok_or_else(|| SurveyError::not_found("Survey", id))
}

/// Loads a survey and checks that `actor_id` created it.
pub(crate) async fn load_owned_survey(
    surveys: &dyn SurveyRepository,
    id: &SurveyId,
    actor_id: &RespondentId,
) -> Result<Survey, SurveyError> {
    let survey = load_survey(surveys, id).await?;
    if !survey.is_owned_by(actor_id) {
        return Err(SurveyError::Forbidden);
    }
    Ok(survey)
}
