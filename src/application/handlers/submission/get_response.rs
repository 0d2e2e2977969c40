//! GetResponseHandler - Query handler for one response with its answers.

use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::loaders::load_survey;
use crate::domain::foundation::{QuestionId, RespondentId, ResponseId, SurveyId, Timestamp};
use crate::domain::survey::{AnswerValue, SurveyError};
use crate::ports::{ResponseReader, SurveyRepository};

#[derive(Debug, Clone)]
pub struct GetResponseQuery {
    /// Survey owner or the respondent who submitted the response.
    pub viewer_id: RespondentId,
    pub response_id: ResponseId,
}

/// One answer next to the question it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub question_text: String,
    pub order: u32,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDetail {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    pub survey_title: String,
    pub respondent_id: RespondentId,
    pub submitted_at: Timestamp,
    pub is_complete: bool,
    /// Answers in question order.
    pub answers: Vec<AnsweredQuestion>,
}

pub struct GetResponseHandler {
    surveys: Arc<dyn SurveyRepository>,
    reader: Arc<dyn ResponseReader>,
}

impl GetResponseHandler {
    pub fn new(surveys: Arc<dyn SurveyRepository>, reader: Arc<dyn ResponseReader>) -> Self {
        Self { surveys, reader }
    }

    pub async fn handle(&self, query: GetResponseQuery) -> Result<ResponseDetail, SurveyError> {
        let stored = self
            .reader
            .find_by_id(&query.response_id)
            .await?
            .ok_or_else(|| SurveyError::not_found("Response", query.response_id))?;
        let response = stored.response;

        let survey = load_survey(self.surveys.as_ref(), response.survey_id()).await?;
        if response.respondent_id() != &query.viewer_id && !survey.is_owned_by(&query.viewer_id) {
            return Err(SurveyError::Forbidden);
        }

        let mut answers: Vec<AnsweredQuestion> = stored
            .answers
            .into_iter()
            .filter_map(|answer| {
                let question = survey.question(&answer.question_id)?;
                Some(AnsweredQuestion {
                    question_id: answer.question_id,
                    question_text: question.text().to_string(),
                    order: question.order(),
                    value: answer.value,
                })
            })
            .collect();
        answers.sort_by_key(|a| a.order);

        Ok(ResponseDetail {
            response_id: *response.id(),
            survey_id: *response.survey_id(),
            survey_title: survey.title().to_string(),
            respondent_id: *response.respondent_id(),
            submitted_at: *response.submitted_at(),
            is_complete: response.is_complete(),
            answers,
        })
    }
}
