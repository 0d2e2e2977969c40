//! SubmitResponseHandler - Command handler for submitting a full set of
//! answers to a survey.
//!
//! Steps, in order:
//! 1. Re-check eligibility at call time (`NotEligible`)
//! 2. Reject a second response for the pair (`AlreadySubmitted`)
//! 3. Validate every question, collecting all violations (`ValidationFailed`)
//! 4. Write the response and its answers in one atomic store call
//!
//! A concurrent submission that wins the race between steps 2 and 4 is
//! caught by the store's uniqueness constraint and also reported as
//! `AlreadySubmitted`. A survey edit committed in the same window makes the
//! store reject the write with `SurveyChanged`, and the caller may retry
//! against the new question set.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::handlers::loaders::{load_respondent, load_survey};
use crate::domain::foundation::{QuestionId, RespondentId, SurveyId, Timestamp};
use crate::domain::survey::{
    Answer, AnswerValidator, EligibilityResolver, Response, SurveyError,
};
use crate::ports::{RespondentRepository, ResponseRepository, SurveyRepository};

/// Command to submit a response.
#[derive(Debug, Clone)]
pub struct SubmitResponseCommand {
    pub respondent_id: RespondentId,
    pub survey_id: SurveyId,
    /// Raw values keyed by question. Missing keys count as absent answers.
    pub answers: HashMap<QuestionId, String>,
    pub now: Timestamp,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitResponseResult {
    pub response: Response,
    pub answers: Vec<Answer>,
}

pub struct SubmitResponseHandler {
    respondents: Arc<dyn RespondentRepository>,
    surveys: Arc<dyn SurveyRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl SubmitResponseHandler {
    pub fn new(
        respondents: Arc<dyn RespondentRepository>,
        surveys: Arc<dyn SurveyRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            respondents,
            surveys,
            responses,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitResponseCommand,
    ) -> Result<SubmitResponseResult, SurveyError> {
        let respondent = load_respondent(self.respondents.as_ref(), &cmd.respondent_id).await?;
        let survey = load_survey(self.surveys.as_ref(), &cmd.survey_id).await?;

        if let Err(reason) = EligibilityResolver::check(&survey, &respondent, &cmd.now) {
            warn!(
                survey_id = %cmd.survey_id,
                respondent_id = %cmd.respondent_id,
                ?reason,
                "Submission rejected: not eligible"
            );
            return Err(SurveyError::NotEligible);
        }

        if self
            .responses
            .exists_for(survey.id(), respondent.id())
            .await?
        {
            return Err(SurveyError::AlreadySubmitted);
        }

        let accepted = AnswerValidator::validate_submission(survey.questions(), &cmd.answers)
            .map_err(|violations| {
                info!(
                    survey_id = %cmd.survey_id,
                    respondent_id = %cmd.respondent_id,
                    violations = violations.len(),
                    "Submission rejected: validation failed"
                );
                SurveyError::ValidationFailed(violations)
            })?;

        let response = Response::complete(*survey.id(), *respondent.id(), cmd.now);
        let answers: Vec<Answer> = accepted
            .into_iter()
            .map(|(question_id, value)| Answer::new(*response.id(), question_id, value))
            .collect();

        if let Err(err) = self
            .responses
            .submit(&response, &answers, survey.revision())
            .await
        {
            let err = SurveyError::from(err);
            if err.is_retryable() {
                warn!(survey_id = %cmd.survey_id, error = %err, "Submission not stored, retryable");
            }
            return Err(err);
        }

        info!(
            survey_id = %cmd.survey_id,
            respondent_id = %cmd.respondent_id,
            response_id = %response.id(),
            answers = answers.len(),
            "Response submitted"
        );

        Ok(SubmitResponseResult { response, answers })
    }
}
