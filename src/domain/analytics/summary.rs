//! Read models produced by the aggregation engine.

use serde::Serialize;

use crate::domain::foundation::{QuestionId, SurveyId};
use crate::domain::survey::QuestionType;

/// One configured choice and how often it was picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceBucket {
    pub label: String,
    pub count: u32,
    pub percentage: f64,
}

/// Frequency table for a multiple choice question, in configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceSummary {
    pub buckets: Vec<ChoiceBucket>,
    /// Sum of all bucket counts.
    pub total: u32,
}

impl ChoiceSummary {
    pub fn count_for(&self, label: &str) -> Option<u32> {
        self.buckets.iter().find(|b| b.label == label).map(|b| b.count)
    }
}

/// One point of a likert scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBucket {
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub count: u32,
    pub percentage: f64,
}

/// Distribution of a likert question over every point of its scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleSummary {
    pub min: i32,
    pub max: i32,
    pub buckets: Vec<ScaleBucket>,
    pub count: u32,
    /// Arithmetic mean of recorded values, `None` without answers.
    pub mean: Option<f64>,
}

impl ScaleSummary {
    pub fn count_for(&self, value: i32) -> Option<u32> {
        self.buckets.iter().find(|b| b.value == value).map(|b| b.count)
    }
}

/// Word and its number of occurrences across all text answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordWeight {
    pub text: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSummary {
    pub count: u32,
    pub responses: Vec<String>,
    pub word_frequency: Vec<WordWeight>,
}

/// Per-question summary, one variant per question type family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Choice(ChoiceSummary),
    Scale(ScaleSummary),
    Text(TextSummary),
}

impl Summary {
    /// Number of answers counted in this summary.
    pub fn answer_count(&self) -> u32 {
        match self {
            Summary::Choice(s) => s.total,
            Summary::Scale(s) => s.count,
            Summary::Text(s) => s.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub question_id: QuestionId,
    pub text: String,
    pub question_type: QuestionType,
    pub order: u32,
    pub is_required: bool,
    pub summary: Summary,
}

/// Analytics for a whole survey, questions in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyAnalytics {
    pub survey_id: SurveyId,
    pub title: String,
    pub total_responses: u32,
    pub questions: Vec<QuestionSummary>,
}

impl SurveyAnalytics {
    pub fn summary_for(&self, question_id: &QuestionId) -> Option<&Summary> {
        self.questions
            .iter()
            .find(|q| &q.question_id == question_id)
            .map(|q| &q.summary)
    }
}
