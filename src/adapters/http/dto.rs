//! HTTP DTOs.
//!
//! These types decouple the HTTP API from domain types. Query views from the
//! application layer that are already `Serialize` are returned as they are.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::SubmitResponseResult;
use crate::domain::foundation::{
    QuestionId, RespondentId, ResponseId, SectionId, SurveyId, Timestamp,
};
use crate::domain::respondent::{Respondent, RespondentKind};
use crate::domain::section::Section;
use crate::domain::survey::{
    LikertScale, Question, QuestionDraft, QuestionKind, QuestionType, ScaleLabel, Survey,
    SurveySettings, DEFAULT_LIKERT_MAX, DEFAULT_LIKERT_MIN,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSectionRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRespondentRequest {
    pub display_name: String,
    pub kind: RespondentKind,
    #[serde(default)]
    pub section_id: Option<SectionId>,
}

/// Question definition in flat form. Only the fields of the chosen
/// `question_type` are read.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub likert_min: Option<i32>,
    #[serde(default)]
    pub likert_max: Option<i32>,
    #[serde(default)]
    pub likert_labels: Vec<ScaleLabel>,
}

impl QuestionRequest {
    /// Builds the domain draft. Configuration is validated when the draft is
    /// added to a survey.
    pub fn into_draft(self) -> QuestionDraft {
        let kind = match self.question_type {
            QuestionType::MultipleChoice => QuestionKind::MultipleChoice {
                choices: self.choices,
            },
            QuestionType::Likert => QuestionKind::Likert(LikertScale {
                min: self.likert_min.unwrap_or(DEFAULT_LIKERT_MIN),
                max: self.likert_max.unwrap_or(DEFAULT_LIKERT_MAX),
                labels: self.likert_labels,
            }),
            QuestionType::ShortAnswer => QuestionKind::ShortAnswer,
            QuestionType::LongAnswer => QuestionKind::LongAnswer,
        };
        QuestionDraft {
            text: self.text,
            kind,
            is_required: self.is_required,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurveyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub section_ids: Vec<SectionId>,
    #[serde(default)]
    pub questions: Vec<QuestionRequest>,
}

/// Partial settings update. An explicit `"due_date": null` clears the due
/// date; omitting the field leaves it unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSurveySettingsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateSurveySettingsRequest> for SurveySettings {
    fn from(req: UpdateSurveySettingsRequest) -> Self {
        SurveySettings {
            title: req.title,
            description: req.description,
            is_active: req.is_active,
            due_date: req.due_date.map(|d| d.map(Timestamp::from_datetime)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignSectionsRequest {
    pub section_ids: Vec<SectionId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderQuestionsRequest {
    pub question_ids: Vec<QuestionId>,
}

/// Query string of the response listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
}

/// Query string of the dashboard. Empty values and `all` mean no filter;
/// dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub survey_id: Option<String>,
    pub section_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// A raw answer as sent by a form: text, or a bare JSON number for likert
/// questions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl RawAnswer {
    pub fn into_raw(self) -> String {
        match self {
            RawAnswer::Text(text) => text,
            RawAnswer::Integer(n) => n.to_string(),
            RawAnswer::Decimal(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseRequest {
    /// `null` values count as unanswered.
    #[serde(default)]
    pub answers: HashMap<QuestionId, Option<RawAnswer>>,
}

impl SubmitResponseRequest {
    pub fn into_raw_answers(self) -> HashMap<QuestionId, String> {
        self.answers
            .into_iter()
            .filter_map(|(id, value)| value.map(|v| (id, v.into_raw())))
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SectionResponse {
    pub id: SectionId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub created_at: Timestamp,
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            id: *section.id(),
            name: section.name().to_string(),
            code: section.code().to_string(),
            description: section.description().to_string(),
            created_at: *section.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RespondentResponse {
    pub id: RespondentId,
    pub display_name: String,
    pub kind: RespondentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
}

impl From<&Respondent> for RespondentResponse {
    fn from(respondent: &Respondent) -> Self {
        Self {
            id: *respondent.id(),
            display_name: respondent.display_name().to_string(),
            kind: respondent.kind(),
            section_id: respondent.section_id().copied(),
        }
    }
}

/// Question with its type configuration flattened in (`type`, `choices`,
/// `min`/`max`/`labels`).
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub text: String,
    pub is_required: bool,
    pub order: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: *question.id(),
            text: question.text().to_string(),
            is_required: question.is_required(),
            order: question.order(),
            kind: question.kind().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyResponse {
    pub id: SurveyId,
    pub title: String,
    pub description: String,
    pub creator_id: RespondentId,
    pub is_active: bool,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub section_ids: Vec<SectionId>,
    pub questions: Vec<QuestionResponse>,
}

impl From<&Survey> for SurveyResponse {
    fn from(survey: &Survey) -> Self {
        Self {
            id: *survey.id(),
            title: survey.title().to_string(),
            description: survey.description().to_string(),
            creator_id: *survey.creator_id(),
            is_active: survey.is_active(),
            due_date: survey.due_date().copied(),
            created_at: *survey.created_at(),
            updated_at: *survey.updated_at(),
            section_ids: survey.section_ids().iter().copied().collect(),
            questions: survey.questions().iter().map(QuestionResponse::from).collect(),
        }
    }
}

/// Acknowledgement for an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub response_id: ResponseId,
    pub survey_id: SurveyId,
    pub submitted_at: Timestamp,
    pub answer_count: u32,
}

impl From<&SubmitResponseResult> for SubmissionResponse {
    fn from(result: &SubmitResponseResult) -> Self {
        Self {
            response_id: *result.response.id(),
            survey_id: *result.response.survey_id(),
            submitted_at: *result.response.submitted_at(),
            answer_count: result.answers.len() as u32,
        }
    }
}
