//! Response and Answer entities.
//!
//! A Response is created exactly once per (survey, respondent) pair and owns
//! its Answers. Once complete it is immutable, so neither type exposes
//! mutators.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnswerId, QuestionId, RespondentId, ResponseId, SurveyId, Timestamp};

/// Normalized answer value, one variant per question type family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    /// Short or long free text.
    Text(String),
    /// One of the configured multiple choice labels.
    Choice(String),
    /// A point on a likert scale.
    Number(i32),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i32> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One stored answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub response_id: ResponseId,
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(response_id: ResponseId, question_id: QuestionId, value: AnswerValue) -> Self {
        Self {
            id: AnswerId::new(),
            response_id,
            question_id,
            value,
        }
    }
}

/// A respondent's submission to a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    id: ResponseId,
    survey_id: SurveyId,
    respondent_id: RespondentId,
    submitted_at: Timestamp,
    is_complete: bool,
}

impl Response {
    /// Creates a complete response submitted at `now`.
    pub fn complete(survey_id: SurveyId, respondent_id: RespondentId, now: Timestamp) -> Self {
        Self {
            id: ResponseId::new(),
            survey_id,
            respondent_id,
            submitted_at: now,
            is_complete: true,
        }
    }

    /// Reconstitute a response from persistence.
    pub fn reconstitute(
        id: ResponseId,
        survey_id: SurveyId,
        respondent_id: RespondentId,
        submitted_at: Timestamp,
        is_complete: bool,
    ) -> Self {
        Self {
            id,
            survey_id,
            respondent_id,
            submitted_at,
            is_complete,
        }
    }

    pub fn id(&self) -> &ResponseId {
        &self.id
    }

    pub fn survey_id(&self) -> &SurveyId {
        &self.survey_id
    }

    pub fn respondent_id(&self) -> &RespondentId {
        &self.respondent_id
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }
}
